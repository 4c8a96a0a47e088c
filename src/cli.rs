// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use clap::Parser;

use crate::config;
use crate::error::Fallible;
use crate::server::start_server;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Start the flashcard server.
    Serve {
        /// Path to the SQLite database file.
        #[arg(long, default_value = "wordcards.db")]
        db: String,
        /// Optional path to a TOML configuration file.
        #[arg(long)]
        config: Option<String>,
        /// Override the configured bind address.
        #[arg(long)]
        bind: Option<String>,
    },
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Serve { db, config, bind } => {
            let config = config::load(config.as_deref())?;
            start_server(config, &db, bind).await
        }
    }
}
