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

mod cli;
mod config;
mod db;
mod enrich;
mod error;
#[cfg(test)]
mod helper;
mod job;
mod notify;
mod quiz;
mod scheduler;
mod server;
mod types;

#[tokio::main]
async fn main() {
    env_logger::init();
    if let Err(error) = cli::entrypoint().await {
        eprintln!("{error}");
        std::process::exit(1);
    }
}
