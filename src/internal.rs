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

use crate::error::HostError;
use crate::fs::CgroupFs;
use crate::Config;

/// Checks that the host exposes a cgroups v1 CPU controller at `config.cpu_root`.
pub fn os_check<F: CgroupFs + ?Sized>(fs: &F, config: &Config) -> Result<(), HostError> {
	if !cfg!(target_os = "linux") {
		return Err(HostError::UnsupportedOs);
	}
	// cgroups v2 has no cpu.shares; its equivalent is cpu.weight.
	let path = config.cpu_root.join("cpu.shares");
	fs.read_file(&path)
		.map(|_| ())
		.map_err(|source| HostError::MissingCpuController { path, source })
}
