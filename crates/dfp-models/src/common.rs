/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-dot-]browne[-at-]dwightjbrowne[-dot-]com
 *
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

//! Common types shared by DFP API responses

use serde::{Deserialize, Serialize};

/// Envelope every successful call is wrapped in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
  /// Return value of the remote method
  pub rval: T,
}

/// Fault body returned instead of an envelope when a call fails
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiFaultResponse {
  pub fault: ApiFault,
}

/// Server-side fault description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFault {
  /// Summary message
  pub fault_string: String,

  /// Individual errors, if the server itemized them
  #[serde(default)]
  pub errors: Vec<ApiErrorDetail>,
}

/// One itemized API error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorDetail {
  /// Path to the offending field, e.g. `filterStatement.query`
  #[serde(default)]
  pub field_path: Option<String>,

  /// Machine-readable reason, e.g. `PublisherQueryLanguageSyntaxError.UNPARSABLE`
  pub error_string: String,

  /// Value that triggered the error
  #[serde(default)]
  pub trigger: Option<String>,
}

impl std::fmt::Display for ApiFault {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.fault_string)?;
    for error in &self.errors {
      write!(f, "; {}", error.error_string)?;
      if let Some(path) = &error.field_path {
        write!(f, " @ {}", path)?;
      }
      if let Some(trigger) = &error.trigger {
        write!(f, " (trigger: '{}')", trigger)?;
      }
    }
    Ok(())
  }
}
