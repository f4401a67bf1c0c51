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

use std::ffi::OsStr;

use tracing::debug;
use tracing::warn;

use crate::error::SearchError;
use crate::fs::CgroupFs;
use crate::walk;
use crate::CGroup;
use crate::Config;

/// Finds the group of the pod with the given uid anywhere below the scheduling root.
///
/// `Ok(None)` means the whole tree was scanned without a match. Only a failure to list the
/// scheduling root itself is an error; unreadable subtrees are skipped.
pub fn find_pod_cgroup<F: CgroupFs + ?Sized>(
	fs: &F,
	config: &Config,
	uid: &str,
) -> Result<Option<CGroup>, SearchError> {
	let root = config.scheduling_root();
	let wanted = config.pod_group_name(uid);
	for entry in walk::descendants(fs, &root) {
		match entry {
			Ok(relative) if relative.file_name() == Some(OsStr::new(&wanted)) => {
				let found = root.join(relative);
				debug!(%found, "found pod group");
				return Ok(Some(found));
			}
			Ok(_) => {}
			Err(err) if err.path == root.as_path() => {
				return Err(SearchError {
					root: err.path,
					source: err.source,
				});
			}
			Err(err) => warn!("skipping: {err}"),
		}
	}
	Ok(None)
}
