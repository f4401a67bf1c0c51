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

//! Moving all container groups of a pod into a target scheduling class.
//!
//! A pod group holds one child group per container. Each container group is moved on its own:
//! its subtree is mirrored below the target class, then the tasks of every mirrored group are
//! drained into their new group. The first container that fails ends the run; containers moved
//! before it stay moved. Source groups are left in place, empty of tasks.

use std::fmt;

use tracing::debug;
use tracing::error;
use tracing::info;

use crate::drain::drain_tasks;
use crate::error::Error;
use crate::error::TaskWriteError;
use crate::fs::CgroupFs;
use crate::locate::find_pod_cgroup;
use crate::mirror::mirror_hierarchy;
use crate::workload::select_workload;
use crate::workload::Workload;
use crate::workload::WorkloadQuery;
use crate::CGroup;
use crate::Config;
use crate::CpuParameters;

/// Progress of a pod migration: `Located → Enumerated → (Mirrored → Migrated)* → Done | Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
	Located,
	Enumerated,
	Mirrored,
	Migrated,
	Done,
	Failed,
}

impl fmt::Display for Phase {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Phase::Located => "located",
			Phase::Enumerated => "enumerated",
			Phase::Mirrored => "mirrored",
			Phase::Migrated => "migrated",
			Phase::Done => "done",
			Phase::Failed => "failed",
		})
	}
}

#[derive(Debug)]
pub struct ContainerReport {
	pub source: CGroup,
	pub target: CGroup,
	/// Groups created at the target, the container group included.
	pub groups: usize,
	pub moved: usize,
	pub failures: Vec<TaskWriteError>,
}

impl ContainerReport {
	pub fn already_in_place(&self) -> bool {
		self.source == self.target
	}
}

#[derive(Debug)]
pub struct MigrationReport {
	pub pod: CGroup,
	pub containers: Vec<ContainerReport>,
}

#[derive(Debug)]
pub enum Outcome {
	/// No pod with that name is eligible for migration.
	WorkloadNotFound { name: String },
	/// The pod exists but has no group below the scheduling root on this host.
	CgroupNotFound { name: String, uid: String },
	Moved(MigrationReport),
}

/// Looks up the pod called `name` and moves its container groups into `target_class`.
///
/// `target_class` is relative to the scheduling root; the empty string is the root itself.
pub fn run<Q, F>(query: &Q, fs: &F, config: &Config, name: &str, target_class: &str) -> Result<Outcome, Error>
where
	Q: WorkloadQuery + ?Sized,
	F: CgroupFs + ?Sized,
{
	class_root(config, target_class)?;
	let workloads = query.list_workloads(&config.namespace)?;
	let Some(workload) = select_workload(&workloads, config, name) else {
		info!(pod = name, namespace = %config.namespace, "pod not found");
		return Ok(Outcome::WorkloadNotFound { name: name.to_string() });
	};
	migrate_workload(fs, config, workload, target_class)
}

pub fn migrate_workload<F: CgroupFs + ?Sized>(
	fs: &F,
	config: &Config,
	workload: &Workload,
	target_class: &str,
) -> Result<Outcome, Error> {
	let Some(pod) = find_pod_cgroup(fs, config, &workload.uid)? else {
		info!(pod = %workload.name, uid = %workload.uid, "no control group for pod");
		return Ok(Outcome::CgroupNotFound {
			name: workload.name.clone(),
			uid: workload.uid.clone(),
		});
	};
	info!(phase = %Phase::Located, uid = %workload.uid, %pod);
	Ok(Outcome::Moved(migrate_pod(fs, config, &pod, target_class)?))
}

/// Moves every container group directly below `pod`, in name order.
pub fn migrate_pod<F: CgroupFs + ?Sized>(
	fs: &F,
	config: &Config,
	pod: &CGroup,
	target_class: &str,
) -> Result<MigrationReport, Error> {
	let plan = plan_containers(fs, pod, &class_root(config, target_class)?)?;
	info!(phase = %Phase::Enumerated, %pod, containers = plan.len());
	for (from, to) in plan.iter() {
		if from != to && pod.contains(to) {
			return Err(Error::TargetInsideSource {
				from: pod.clone(),
				to: to.clone(),
			});
		}
	}
	let mut containers = Vec::with_capacity(plan.len());
	for (from, to) in plan {
		match migrate_container(fs, config, &from, &to) {
			Ok(report) => containers.push(report),
			Err(err) => {
				error!(phase = %Phase::Failed, container = %from, moved = containers.len(), "{err}");
				return Err(err);
			}
		}
	}
	info!(phase = %Phase::Done, %pod, containers = containers.len());
	Ok(MigrationReport {
		pod: pod.clone(),
		containers,
	})
}

/// Pairs each container group of `pod` with its group below `class_root`, keyed by leaf name.
pub fn plan_containers<F: CgroupFs + ?Sized>(
	fs: &F,
	pod: &CGroup,
	class_root: &CGroup,
) -> Result<Vec<(CGroup, CGroup)>, Error> {
	let entries = fs.list_dir(pod.as_path()).map_err(|source| Error::Enumerate {
		path: pod.as_path().to_path_buf(),
		source,
	})?;
	Ok(entries
		.into_iter()
		.filter(|entry| entry.is_dir)
		.map(|entry| (pod.join(&entry.name), class_root.join(&entry.name)))
		.collect())
}

/// Mirrors one container group to `target` and drains the tasks of every group in its subtree.
pub fn migrate_container<F: CgroupFs + ?Sized>(
	fs: &F,
	config: &Config,
	source: &CGroup,
	target: &CGroup,
) -> Result<ContainerReport, Error> {
	let mut report = ContainerReport {
		source: source.clone(),
		target: target.clone(),
		groups: 0,
		moved: 0,
		failures: Vec::new(),
	};
	if report.already_in_place() {
		info!(container = %source, "already in place");
		return Ok(report);
	}

	let mirrored = mirror_hierarchy(fs, config, source, target).map_err(|err| Error::Mirror {
		container: source.clone(),
		source: err,
	})?;
	report.groups = mirrored.groups.len();
	info!(phase = %Phase::Mirrored, container = %source, %target, groups = report.groups);
	match CpuParameters::read(fs, target) {
		Ok(params) => debug!(?params, %target, "cpu parameters"),
		Err(err) => debug!("{err}"),
	}

	for (from, to) in mirrored.groups.iter() {
		let drained = drain_tasks(fs, config, from, to).map_err(|err| Error::Drain {
			container: source.clone(),
			source: err,
		})?;
		report.moved += drained.moved.len();
		report.failures.extend(drained.failures);
	}
	info!(
		phase = %Phase::Migrated,
		container = %source,
		moved = report.moved,
		failed = report.failures.len()
	);
	Ok(report)
}

fn class_root(config: &Config, target_class: &str) -> Result<CGroup, Error> {
	config
		.target_class_root(target_class)
		.ok_or_else(|| Error::InvalidTargetClass(target_class.to_string()))
}
