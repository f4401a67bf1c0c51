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

use std::fmt;
use std::io;
use std::num::ParseIntError;
use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::fs::CgroupFs;

/// A group in the CPU controller hierarchy, named by its absolute path in the cgroupfs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CGroup(PathBuf);

impl CGroup {
	pub fn from_path(path: impl AsRef<Path>) -> Self {
		Self(PathBuf::from(path.as_ref()))
	}

	pub fn as_path(&self) -> &Path {
		&self.0
	}

	/// # Examples
	///
	/// ```
	/// use movepodcgroup::CGroup;
	///
	/// let pod = CGroup::from_path("/sys/fs/cgroup/cpu/kubepods/burstable/podabc");
	/// let container = pod.join("docker-aaa");
	/// assert_eq!(container.name(), Some("docker-aaa"));
	/// assert!(pod.contains(&container));
	/// assert!(!container.contains(&pod));
	/// ```
	pub fn join(&self, path: impl AsRef<Path>) -> Self {
		Self(self.0.join(path))
	}

	/// The leaf directory name of the group.
	pub fn name(&self) -> Option<&str> {
		self.0.file_name().and_then(|name| name.to_str())
	}

	/// Path of one of the control files inside the group.
	pub fn file(&self, name: &str) -> PathBuf {
		self.0.join(name)
	}

	/// Whether `other` is this group or one of its descendants.
	pub fn contains(&self, other: &CGroup) -> bool {
		other.0.starts_with(&self.0)
	}
}

impl AsRef<Path> for CGroup {
	fn as_ref(&self) -> &Path {
		&self.0
	}
}

impl fmt::Display for CGroup {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0.display())
	}
}

/// A kernel task (process or thread) id as listed in a `tasks` file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub u32);

impl FromStr for TaskId {
	type Err = ParseIntError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		s.trim().parse().map(TaskId)
	}
}

impl fmt::Display for TaskId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.fmt(f)
	}
}

#[derive(Debug, Error)]
pub enum ParameterError {
	#[error("cannot read {}: {source}", path.display())]
	Read {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("{} does not hold an integer: {value:?}", path.display())]
	Parse { path: PathBuf, value: String },
}

/// CPU controller settings of one group. `-1` means unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuParameters {
	pub cfs_period_us: i64,
	pub cfs_quota_us: i64,
	pub rt_period_us: i64,
	pub rt_runtime_us: i64,
	pub shares: i64,
}

impl CpuParameters {
	pub fn read<F: CgroupFs + ?Sized>(fs: &F, cgroup: &CGroup) -> Result<Self, ParameterError> {
		let value = |name: &str| -> Result<i64, ParameterError> {
			let path = cgroup.file(name);
			let contents = fs.read_file(&path).map_err(|source| ParameterError::Read {
				path: path.clone(),
				source,
			})?;
			let text = String::from_utf8_lossy(&contents);
			text.trim().parse().map_err(|_| ParameterError::Parse {
				path,
				value: text.trim().to_string(),
			})
		};
		Ok(Self {
			cfs_period_us: value("cpu.cfs_period_us")?,
			cfs_quota_us: value("cpu.cfs_quota_us")?,
			rt_period_us: value("cpu.rt_period_us")?,
			rt_runtime_us: value("cpu.rt_runtime_us")?,
			shares: value("cpu.shares")?,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fs::memory::MemoryFs;

	#[test]
	fn test_task_id() {
		assert_eq!(" 42\n".parse::<TaskId>(), Ok(TaskId(42)));
		assert!("-3".parse::<TaskId>().is_err());
		assert!("12 13".parse::<TaskId>().is_err());
		assert_eq!(TaskId(7).to_string(), "7");
	}

	#[test]
	fn test_name_and_contains() {
		let root = CGroup::from_path("/sys/fs/cgroup/cpu");
		assert_eq!(root.name(), Some("cpu"));
		assert!(root.contains(&root));
		assert!(!root.contains(&CGroup::from_path("/sys/fs/cgroup/cpuacct")));
		assert_eq!(root.file("tasks"), PathBuf::from("/sys/fs/cgroup/cpu/tasks"));
		assert_eq!(root.to_string(), "/sys/fs/cgroup/cpu");
	}

	#[test]
	fn test_read_parameters() {
		let fs = MemoryFs::new();
		let group = CGroup::from_path("/cpu/g");
		fs.add_group(group.as_path());
		fs.set_parameters(group.as_path(), ["100000", "-1", "1000000", "0", "1024"]);
		let params = CpuParameters::read(&fs, &group).unwrap();
		assert_eq!(
			params,
			CpuParameters {
				cfs_period_us: 100000,
				cfs_quota_us: -1,
				rt_period_us: 1000000,
				rt_runtime_us: 0,
				shares: 1024,
			}
		);
	}

	#[test]
	fn test_read_parameters_errors() {
		let fs = MemoryFs::new();
		let group = CGroup::from_path("/cpu/g");
		fs.add_group(group.as_path());
		assert!(matches!(CpuParameters::read(&fs, &group), Err(ParameterError::Read { .. })));
		fs.set_parameters(group.as_path(), ["100000", "max", "1000000", "0", "1024"]);
		let err = CpuParameters::read(&fs, &group).unwrap_err();
		assert!(matches!(err, ParameterError::Parse { ref value, .. } if value == "max"));
	}
}
