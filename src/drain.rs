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

use std::io;
use std::path::Path;

use tracing::debug;
use tracing::warn;

use crate::error::DrainError;
use crate::error::TaskWriteError;
use crate::fs::CgroupFs;
use crate::CGroup;
use crate::Config;
use crate::TaskId;

#[derive(Debug, Default)]
pub struct DrainReport {
	/// Passes that found tasks to move.
	pub passes: usize,
	/// Tasks written to the target, in order. A task listed again after moving appears twice.
	pub moved: Vec<TaskId>,
	/// One entry per task that failed to move, however many passes it failed in.
	pub failures: Vec<TaskWriteError>,
}

/// Moves every task of `source` into `target` until `source` lists no tasks.
///
/// Tasks are written one per write. Tasks forked into `source` while a pass runs are picked up
/// by the next pass. A task that cannot be moved is recorded in the report and does not stop the
/// drain; if `source` still lists tasks after `config.max_drain_passes` passes the drain fails.
pub fn drain_tasks<F: CgroupFs + ?Sized>(
	fs: &F,
	config: &Config,
	source: &CGroup,
	target: &CGroup,
) -> Result<DrainReport, DrainError> {
	let from = source.file(&config.tasks_file);
	let to = target.file(&config.tasks_file);
	let mut report = DrainReport::default();
	loop {
		let listed = read_tasks(fs, &from)?;
		if listed.is_empty() {
			return Ok(report);
		}
		if report.passes >= config.max_drain_passes {
			return Err(DrainError::Timeout {
				path: from,
				passes: report.passes,
				remaining: listed,
			});
		}
		report.passes += 1;
		debug!(%source, pass = report.passes, tasks = listed.len(), "moving tasks");
		for raw in listed {
			let written = match raw.parse::<TaskId>() {
				Ok(task) => fs.write_file(&to, task.to_string().as_bytes()).map(|()| task),
				Err(err) => Err(io::Error::new(io::ErrorKind::InvalidData, err)),
			};
			match written {
				Ok(task) => report.moved.push(task),
				Err(source) => record_failure(
					&mut report.failures,
					TaskWriteError {
						task: raw,
						path: to.clone(),
						source,
					},
				),
			}
		}
	}
}

/// Keeps the first failure of each task. Later failures of the same task are only logged.
fn record_failure(failures: &mut Vec<TaskWriteError>, err: TaskWriteError) {
	if failures.iter().any(|seen| seen.task == err.task) {
		debug!("{err}");
	} else {
		warn!("{err}");
		failures.push(err);
	}
}

fn read_tasks<F: CgroupFs + ?Sized>(fs: &F, path: &Path) -> Result<Vec<String>, DrainError> {
	let contents = fs.read_file(path).map_err(|source| DrainError::Read {
		path: path.to_path_buf(),
		source,
	})?;
	Ok(String::from_utf8_lossy(&contents)
		.lines()
		.map(str::trim)
		.filter(|line| !line.is_empty())
		.map(str::to_string)
		.collect())
}
