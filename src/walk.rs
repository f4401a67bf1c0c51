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

use std::path::PathBuf;

use crate::error::WalkError;
use crate::fs::CgroupFs;
use crate::CGroup;

/// Lazily walks the descendant groups of a root, depth first, parents before children.
///
/// Yields paths relative to the root; the root itself is not yielded. A directory that cannot
/// be listed yields one error and the walk carries on with its siblings. Each directory is
/// listed only when the walk moves past it, so a caller may act on a directory before its
/// children are discovered.
pub struct Descendants<'a, F: ?Sized> {
	fs: &'a F,
	root: CGroup,
	pending: Vec<PathBuf>,
	expand: Option<PathBuf>,
}

pub fn descendants<'a, F: CgroupFs + ?Sized>(fs: &'a F, root: &CGroup) -> Descendants<'a, F> {
	Descendants {
		fs,
		root: root.clone(),
		pending: Vec::new(),
		expand: Some(PathBuf::new()),
	}
}

impl<F: CgroupFs + ?Sized> Iterator for Descendants<'_, F> {
	type Item = Result<PathBuf, WalkError>;

	fn next(&mut self) -> Option<Self::Item> {
		if let Some(relative) = self.expand.take() {
			let path = self.root.as_path().join(&relative);
			match self.fs.list_dir(&path) {
				Ok(entries) => {
					// Reversed so that popping visits siblings in name order.
					for entry in entries.into_iter().rev().filter(|entry| entry.is_dir) {
						self.pending.push(relative.join(entry.name));
					}
				}
				Err(source) => return Some(Err(WalkError { path, source })),
			}
		}
		let relative = self.pending.pop()?;
		self.expand = Some(relative.clone());
		Some(Ok(relative))
	}
}
