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

//! Access to the cgroupfs.
//!
//! Everything the migration does to the host goes through [`CgroupFs`]. In the cgroupfs a
//! directory is a live scheduling group and writing a task id to a group's `tasks` file moves
//! that task out of whichever group currently holds it.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;

use tracing::warn;

#[cfg(test)]
pub(crate) mod memory;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
	pub name: OsString,
	pub is_dir: bool,
}

pub trait CgroupFs {
	fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;

	/// Writes `contents` with a single write call.
	fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

	/// Lists the direct entries of a directory, sorted by name. Symbolic links are not directories.
	fn list_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>>;

	fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// The host filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostFs;

impl CgroupFs for HostFs {
	fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
		fs::read(path)
	}

	fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
		fs::write(path, contents)
	}

	fn list_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
		let entries = fs::read_dir(path)?.map(|entry| -> io::Result<DirEntry> {
			let entry = entry?;
			Ok(DirEntry {
				name: entry.file_name(),
				is_dir: entry.file_type()?.is_dir(),
			})
		});
		Ok(keep_readable(path, entries))
	}

	fn create_dir_all(&self, path: &Path) -> io::Result<()> {
		fs::create_dir_all(path)
	}
}

/// Drops entries that failed to read, so one bad entry does not hide its siblings.
fn keep_readable(path: &Path, entries: impl Iterator<Item = io::Result<DirEntry>>) -> Vec<DirEntry> {
	let mut kept: Vec<DirEntry> = entries
		.filter_map(|entry| match entry {
			Ok(entry) => Some(entry),
			Err(err) => {
				warn!("skipping entry of {}: {err}", path.display());
				None
			}
		})
		.collect();
	kept.sort_by(|a, b| a.name.cmp(&b.name));
	kept
}
