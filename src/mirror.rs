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

use tracing::debug;

use crate::error::MirrorError;
use crate::error::MirrorOp;
use crate::fs::CgroupFs;
use crate::walk;
use crate::CGroup;
use crate::Config;

/// The groups created by [`mirror_hierarchy`], as (source, target) pairs in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorReport {
	pub groups: Vec<(CGroup, CGroup)>,
}

/// Recreates `source` and all of its descendants at `target` and copies their CPU parameters.
///
/// Every group exists at the target before any of its children is created. Nothing at the
/// source is modified, and running it again over an existing target rewrites the same values.
/// `target` must not lie inside `source`.
pub fn mirror_hierarchy<F: CgroupFs + ?Sized>(
	fs: &F,
	config: &Config,
	source: &CGroup,
	target: &CGroup,
) -> Result<MirrorReport, MirrorError> {
	let mut report = MirrorReport::default();
	mirror_group(fs, config, source, target)?;
	report.groups.push((source.clone(), target.clone()));
	for relative in walk::descendants(fs, source) {
		let relative = relative?;
		let (from, to) = (source.join(&relative), target.join(&relative));
		mirror_group(fs, config, &from, &to)?;
		report.groups.push((from, to));
	}
	Ok(report)
}

fn mirror_group<F: CgroupFs + ?Sized>(
	fs: &F,
	config: &Config,
	from: &CGroup,
	to: &CGroup,
) -> Result<(), MirrorError> {
	fs.create_dir_all(to.as_path()).map_err(|source| MirrorError {
		op: MirrorOp::CreateDir,
		path: to.as_path().to_path_buf(),
		parameter: None,
		source,
	})?;
	for name in config.parameter_files.iter() {
		let fail = |op, path, source| MirrorError {
			op,
			path,
			parameter: Some(name.clone()),
			source,
		};
		let src = from.file(name);
		let contents = fs.read_file(&src).map_err(|e| fail(MirrorOp::Read, src.clone(), e))?;
		let dst = to.file(name);
		fs.write_file(&dst, &contents).map_err(|e| fail(MirrorOp::Write, dst.clone(), e))?;
	}
	debug!(%from, %to, "mirrored group");
	Ok(())
}
