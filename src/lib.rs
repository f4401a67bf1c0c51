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

//! This package moves the CPU control groups of a running Kubernetes pod from the burstable
//! scheduling class into another class on the same host, without restarting its processes.
//!
//! It works on the cgroups v1 CPU controller (`/sys/fs/cgroup/cpu`). For every container group of
//! the pod it:
//!
//! 1. recreates the group and all of its child groups below the target class, copying
//!    `cpu.cfs_period_us`, `cpu.cfs_quota_us`, `cpu.rt_period_us`, `cpu.rt_runtime_us` and
//!    `cpu.shares` from each source group;
//! 2. writes the id of every task in each source group's `tasks` file into the new group's `tasks`
//!    file, repeating until the source group is empty.
//!
//! Source groups are not removed. Running the tool again over a partly moved pod finishes the move.
//!
//! The `movepodcgroup` binary finds the pod with `kubectl` and acts on the host's cgroupfs. The
//! library takes both through the [`WorkloadQuery`] and [`CgroupFs`] traits.

mod cgroup;
mod config;
pub mod drain;
pub mod driver;
pub mod error;
pub mod fs;
pub mod locate;
pub mod mirror;
pub mod walk;
pub mod workload;

#[doc(hidden)]
pub mod internal;

pub use cgroup::CGroup;
pub use cgroup::CpuParameters;
pub use cgroup::ParameterError;
pub use cgroup::TaskId;
pub use config::Config;
pub use config::CPU_PARAMETER_FILES;
pub use driver::run;
pub use driver::Outcome;
pub use error::Error;
pub use fs::CgroupFs;
pub use fs::HostFs;
pub use workload::KubectlQuery;
pub use workload::Workload;
pub use workload::WorkloadQuery;
