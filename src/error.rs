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

//! Error handling, following the teacher's hand-rolled style rather than
//! an error-derive crate: a boxed-error result alias for multi-cause
//! failures, plus a one-off string error whose `Display` is
//! `error: <message>`.

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

/// Result alias over a boxed error. The error boxes `Error + Send + Sync`
/// so failures can cross `tokio::spawn` boundaries in the job tasks.
pub type Fallible<T> = Result<T, Box<dyn Error + Send + Sync>>;

/// A one-off string error for failures that do not warrant a dedicated
/// error type. Its `Display` is `error: <message>`.
#[derive(Debug)]
pub struct ErrorReport {
    message: String,
}

impl ErrorReport {
    /// Construct an error report from a message.
    pub fn new(message: &str) -> Self {
        ErrorReport {
            message: message.to_string(),
        }
    }
}

impl Display for ErrorReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "error: {}", self.message)
    }
}

impl Error for ErrorReport {}

/// Return a failed `Fallible` carrying an [`ErrorReport`] with the given
/// message.
pub fn fail<T>(message: &str) -> Fallible<T> {
    Err(Box::new(ErrorReport::new(message)))
}
