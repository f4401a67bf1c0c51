// Copyright 2026 Octave Online LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error types for locating, mirroring and draining control groups.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use crate::CGroup;

/// The pod list could not be obtained from the orchestrator.
#[derive(Debug, Error)]
pub enum QueryError {
	#[error("cannot run {}: {source}", program.display())]
	Spawn {
		program: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("{} exited with {status}: {stderr}", program.display())]
	Failed {
		program: PathBuf,
		status: ExitStatus,
		stderr: String,
	},

	#[error("cannot decode pod list: {0}")]
	Decode(#[from] serde_json::Error),
}

/// The scheduling class root could not be scanned.
#[derive(Debug, Error)]
#[error("cannot search {} for pod control groups: {source}", root.display())]
pub struct SearchError {
	pub root: PathBuf,
	#[source]
	pub source: io::Error,
}

/// A directory of the hierarchy could not be listed while walking it.
#[derive(Debug, Error)]
#[error("cannot list {}: {source}", path.display())]
pub struct WalkError {
	pub path: PathBuf,
	#[source]
	pub source: io::Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorOp {
	CreateDir,
	ListDir,
	Read,
	Write,
}

impl fmt::Display for MirrorOp {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			MirrorOp::CreateDir => "create directory",
			MirrorOp::ListDir => "list directory",
			MirrorOp::Read => "read",
			MirrorOp::Write => "write",
		})
	}
}

/// A group directory or parameter file could not be reproduced at the target.
#[derive(Debug, Error)]
#[error("cannot {op} {}: {source}", path.display())]
pub struct MirrorError {
	pub op: MirrorOp,
	/// The directory, or the parameter file when `parameter` is set.
	pub path: PathBuf,
	pub parameter: Option<String>,
	#[source]
	pub source: io::Error,
}

impl From<WalkError> for MirrorError {
	fn from(err: WalkError) -> Self {
		MirrorError {
			op: MirrorOp::ListDir,
			path: err.path,
			parameter: None,
			source: err.source,
		}
	}
}

/// A single task could not be moved. Recorded and reported, never fatal.
#[derive(Debug, Error)]
#[error("cannot move task {task} into {}: {source}", path.display())]
pub struct TaskWriteError {
	/// The id as it was listed in the source membership file.
	pub task: String,
	pub path: PathBuf,
	#[source]
	pub source: io::Error,
}

#[derive(Debug, Error)]
pub enum DrainError {
	#[error("cannot read task list {}: {source}", path.display())]
	Read {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("{} still lists {} task(s) after {passes} passes: {}", path.display(), remaining.len(), remaining.join(" "))]
	Timeout {
		path: PathBuf,
		passes: usize,
		remaining: Vec<String>,
	},
}

/// The host is not set up for cgroups v1 CPU control.
#[derive(Debug, Error)]
pub enum HostError {
	#[error("control groups are only supported on Linux")]
	UnsupportedOs,

	#[error("no cgroups v1 CPU controller at {}: {source}", path.display())]
	MissingCpuController {
		path: PathBuf,
		#[source]
		source: io::Error,
	},
}

/// Fatal errors of a pod migration.
#[derive(Debug, Error)]
pub enum Error {
	#[error(transparent)]
	Query(#[from] QueryError),

	#[error(transparent)]
	Search(#[from] SearchError),

	#[error("invalid target scheduling class {0:?}: climbs above the scheduling root")]
	InvalidTargetClass(String),

	#[error("cannot list container groups of {}: {source}", path.display())]
	Enumerate {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("target {to} lies inside source {from}")]
	TargetInsideSource { from: CGroup, to: CGroup },

	#[error("failed to mirror {container}")]
	Mirror {
		container: CGroup,
		#[source]
		source: MirrorError,
	},

	#[error("failed to move the tasks of {container}")]
	Drain {
		container: CGroup,
		#[source]
		source: DrainError,
	},
}
