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

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use crate::CGroup;

/// The CPU controller files copied from every mirrored group.
pub const CPU_PARAMETER_FILES: [&str; 5] = [
	"cpu.cfs_period_us",
	"cpu.cfs_quota_us",
	"cpu.rt_period_us",
	"cpu.rt_runtime_us",
	"cpu.shares",
];

/// Where pods live on the host and which of them may be moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	/// Mount point of the cgroups v1 CPU controller.
	pub cpu_root: PathBuf,
	/// The burstable scheduling class, relative to `cpu_root`. Target classes are resolved below it.
	pub scheduling_root: PathBuf,
	/// Pod groups are named by this prefix followed by the pod uid.
	pub pod_prefix: String,
	pub parameter_files: Vec<String>,
	pub tasks_file: String,
	pub namespace: String,
	/// Only pods carrying this label with `label_value` are eligible.
	pub label_key: String,
	pub label_value: String,
	/// Passes over a non-empty `tasks` file before draining gives up.
	pub max_drain_passes: usize,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			cpu_root: PathBuf::from("/sys/fs/cgroup/cpu"),
			scheduling_root: PathBuf::from("kubepods/burstable"),
			pod_prefix: "pod".to_string(),
			parameter_files: CPU_PARAMETER_FILES.iter().map(|name| name.to_string()).collect(),
			tasks_file: "tasks".to_string(),
			namespace: "default".to_string(),
			label_key: "qos".to_string(),
			label_value: "dynamic".to_string(),
			max_drain_passes: 100,
		}
	}
}

impl Config {
	pub fn with_cpu_root(mut self, cpu_root: impl AsRef<Path>) -> Self {
		self.cpu_root = cpu_root.as_ref().to_path_buf();
		self
	}

	pub fn scheduling_root(&self) -> CGroup {
		CGroup::from_path(self.cpu_root.join(&self.scheduling_root))
	}

	/// Name of the group directory of the pod with the given uid.
	pub fn pod_group_name(&self, uid: &str) -> String {
		format!("{}{}", self.pod_prefix, uid)
	}

	/// Resolves a target class below the scheduling root. The empty class is the root itself.
	///
	/// The class is cleaned lexically: leading `/` and `.` components are ignored and `..` drops
	/// the previous name. Returns `None` when a `..` would climb above the scheduling root.
	pub fn target_class_root(&self, class: &str) -> Option<CGroup> {
		let mut resolved = PathBuf::new();
		for component in Path::new(class).components() {
			match component {
				Component::Normal(name) => resolved.push(name),
				Component::RootDir | Component::CurDir => {}
				Component::ParentDir => {
					if !resolved.pop() {
						return None;
					}
				}
				Component::Prefix(_) => return None,
			}
		}
		Some(self.scheduling_root().join(resolved))
	}
}
