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

//! An in-memory cgroupfs for tests, with the kernel's `tasks` semantics and fault injection.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use super::CgroupFs;
use super::DirEntry;

const TASKS: &str = "tasks";

#[derive(Default)]
struct State {
	dirs: BTreeSet<PathBuf>,
	files: BTreeMap<PathBuf, Vec<u8>>,
	/// Which group each live task belongs to.
	tasks: BTreeMap<u32, PathBuf>,
	/// Every id successfully written to each group's `tasks` file, in order.
	written: BTreeMap<PathBuf, Vec<u32>>,
	/// Tasks that are listed but exit when someone tries to move them.
	exiting: BTreeSet<u32>,
	/// Groups that spawn one new task on each of their next N `tasks` reads.
	respawn: BTreeMap<PathBuf, usize>,
	fail_read: BTreeSet<PathBuf>,
	fail_write: BTreeSet<PathBuf>,
	fail_list: BTreeSet<PathBuf>,
	fail_create: BTreeSet<PathBuf>,
	next_task: u32,
	ops: usize,
}

#[derive(Default)]
pub(crate) struct MemoryFs {
	state: RefCell<State>,
}

fn error(kind: io::ErrorKind, path: &Path) -> io::Error {
	io::Error::new(kind, format!("{}", path.display()))
}

fn tasks_group(path: &Path) -> Option<&Path> {
	if path.file_name() == Some(OsStr::new(TASKS)) {
		path.parent()
	} else {
		None
	}
}

impl MemoryFs {
	pub fn new() -> Self {
		let fs = Self::default();
		fs.state.borrow_mut().next_task = 10_000;
		fs
	}

	/// Creates a group and its ancestors.
	pub fn add_group(&self, path: impl AsRef<Path>) {
		let mut state = self.state.borrow_mut();
		for ancestor in path.as_ref().ancestors() {
			state.dirs.insert(ancestor.to_path_buf());
		}
	}

	pub fn set_file(&self, path: impl AsRef<Path>, contents: impl AsRef<[u8]>) {
		self.state.borrow_mut().files.insert(path.as_ref().to_path_buf(), contents.as_ref().to_vec());
	}

	/// Sets the five CPU parameter files, each newline-terminated.
	pub fn set_parameters(&self, group: impl AsRef<Path>, values: [&str; 5]) {
		let names = ["cpu.cfs_period_us", "cpu.cfs_quota_us", "cpu.rt_period_us", "cpu.rt_runtime_us", "cpu.shares"];
		for (name, value) in names.iter().zip(values) {
			self.set_file(group.as_ref().join(name), format!("{value}\n"));
		}
	}

	pub fn add_task(&self, group: impl AsRef<Path>, task: u32) {
		self.state.borrow_mut().tasks.insert(task, group.as_ref().to_path_buf());
	}

	pub fn exiting_task(&self, group: impl AsRef<Path>, task: u32) {
		self.add_task(group, task);
		self.state.borrow_mut().exiting.insert(task);
	}

	pub fn respawn(&self, group: impl AsRef<Path>, reads: usize) {
		self.state.borrow_mut().respawn.insert(group.as_ref().to_path_buf(), reads);
	}

	pub fn fail_read(&self, path: impl AsRef<Path>) {
		self.state.borrow_mut().fail_read.insert(path.as_ref().to_path_buf());
	}

	pub fn fail_write(&self, path: impl AsRef<Path>) {
		self.state.borrow_mut().fail_write.insert(path.as_ref().to_path_buf());
	}

	pub fn fail_list(&self, path: impl AsRef<Path>) {
		self.state.borrow_mut().fail_list.insert(path.as_ref().to_path_buf());
	}

	pub fn fail_create(&self, path: impl AsRef<Path>) {
		self.state.borrow_mut().fail_create.insert(path.as_ref().to_path_buf());
	}

	pub fn tasks_in(&self, group: impl AsRef<Path>) -> Vec<u32> {
		let state = self.state.borrow();
		state.tasks.iter().filter(|(_, g)| g.as_path() == group.as_ref()).map(|(t, _)| *t).collect()
	}

	pub fn written_to(&self, group: impl AsRef<Path>) -> Vec<u32> {
		self.state.borrow().written.get(group.as_ref()).cloned().unwrap_or_default()
	}

	pub fn file(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
		self.state.borrow().files.get(path.as_ref()).cloned()
	}

	pub fn is_dir(&self, path: impl AsRef<Path>) -> bool {
		self.state.borrow().dirs.contains(path.as_ref())
	}

	/// Directories strictly below `root`.
	pub fn dirs_under(&self, root: impl AsRef<Path>) -> Vec<PathBuf> {
		let root = root.as_ref();
		self.state
			.borrow()
			.dirs
			.iter()
			.filter(|dir| dir.starts_with(root) && dir.as_path() != root)
			.filter_map(|dir| dir.strip_prefix(root).ok().map(Path::to_path_buf))
			.collect()
	}

	/// Number of calls made through [`CgroupFs`].
	pub fn ops(&self) -> usize {
		self.state.borrow().ops
	}
}

impl CgroupFs for MemoryFs {
	fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
		let mut state = self.state.borrow_mut();
		state.ops += 1;
		if state.fail_read.contains(path) {
			return Err(error(io::ErrorKind::PermissionDenied, path));
		}
		if let Some(group) = tasks_group(path) {
			if !state.dirs.contains(group) {
				return Err(error(io::ErrorKind::NotFound, path));
			}
			let spawn = match state.respawn.get_mut(group) {
				Some(remaining) if *remaining > 0 => {
					*remaining -= 1;
					true
				}
				_ => false,
			};
			if spawn {
				state.next_task += 1;
				let task = state.next_task;
				state.tasks.insert(task, group.to_path_buf());
			}
			let mut listing = String::new();
			for (task, _) in state.tasks.iter().filter(|(_, g)| g.as_path() == group) {
				listing.push_str(&format!("{task}\n"));
			}
			return Ok(listing.into_bytes());
		}
		state.files.get(path).cloned().ok_or_else(|| error(io::ErrorKind::NotFound, path))
	}

	fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
		let mut state = self.state.borrow_mut();
		state.ops += 1;
		if state.fail_write.contains(path) {
			return Err(error(io::ErrorKind::PermissionDenied, path));
		}
		let parent = path.parent().unwrap_or(Path::new("/"));
		if !state.dirs.contains(parent) {
			return Err(error(io::ErrorKind::NotFound, path));
		}
		if let Some(group) = tasks_group(path) {
			let text = String::from_utf8_lossy(contents);
			let task: u32 = text.trim().parse().map_err(|_| error(io::ErrorKind::InvalidInput, path))?;
			if state.exiting.remove(&task) {
				state.tasks.remove(&task);
			}
			if !state.tasks.contains_key(&task) {
				return Err(io::Error::new(io::ErrorKind::NotFound, format!("no such task {task}")));
			}
			state.tasks.insert(task, group.to_path_buf());
			state.written.entry(group.to_path_buf()).or_default().push(task);
			return Ok(());
		}
		state.files.insert(path.to_path_buf(), contents.to_vec());
		Ok(())
	}

	fn list_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
		let mut state = self.state.borrow_mut();
		state.ops += 1;
		if state.fail_list.contains(path) {
			return Err(error(io::ErrorKind::PermissionDenied, path));
		}
		if !state.dirs.contains(path) {
			return Err(error(io::ErrorKind::NotFound, path));
		}
		let dirs = state.dirs.iter().filter(|d| d.parent() == Some(path)).map(|d| (d, true));
		let files = state.files.keys().filter(|f| f.parent() == Some(path)).map(|f| (f, false));
		let mut entries: Vec<DirEntry> = dirs
			.chain(files)
			.filter_map(|(p, is_dir)| {
				p.file_name().map(|name| DirEntry {
					name: name.to_os_string(),
					is_dir,
				})
			})
			.collect();
		entries.sort_by(|a, b| a.name.cmp(&b.name));
		Ok(entries)
	}

	fn create_dir_all(&self, path: &Path) -> io::Result<()> {
		let mut state = self.state.borrow_mut();
		state.ops += 1;
		if let Some(denied) = path.ancestors().find(|a| state.fail_create.contains(*a)) {
			if !state.dirs.contains(denied) {
				return Err(error(io::ErrorKind::PermissionDenied, denied));
			}
		}
		for ancestor in path.ancestors() {
			state.dirs.insert(ancestor.to_path_buf());
		}
		Ok(())
	}
}
