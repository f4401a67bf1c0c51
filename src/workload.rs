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

//! Pods as reported by the cluster.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Command;

use serde::Deserialize;
use tracing::info;

use crate::error::QueryError;
use crate::Config;

/// A pod, as far as moving its control groups is concerned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workload {
	pub uid: String,
	pub name: String,
	/// The node the pod is scheduled on.
	pub node: String,
	pub labels: BTreeMap<String, String>,
	pub qos_class: String,
}

impl Workload {
	pub fn is_eligible(&self, config: &Config) -> bool {
		self.labels.get(&config.label_key) == Some(&config.label_value)
	}
}

pub trait WorkloadQuery {
	fn list_workloads(&self, namespace: &str) -> Result<Vec<Workload>, QueryError>;
}

/// Picks the eligible workload with the given name, logging each eligible workload seen before it.
pub fn select_workload<'a>(workloads: &'a [Workload], config: &Config, name: &str) -> Option<&'a Workload> {
	workloads.iter().filter(|w| w.is_eligible(config)).find(|w| {
		info!(node = %w.node, uid = %w.uid, pod = %w.name, "eligible pod");
		w.name == name
	})
}

/// Lists pods with `kubectl get pods`.
#[derive(Debug, Clone)]
pub struct KubectlQuery {
	pub program: PathBuf,
}

impl Default for KubectlQuery {
	fn default() -> Self {
		Self {
			program: PathBuf::from("kubectl"),
		}
	}
}

impl WorkloadQuery for KubectlQuery {
	fn list_workloads(&self, namespace: &str) -> Result<Vec<Workload>, QueryError> {
		let output = Command::new(&self.program)
			.args(["get", "pods", "--namespace", namespace, "--output", "json"])
			.output()
			.map_err(|source| QueryError::Spawn {
				program: self.program.clone(),
				source,
			})?;
		if !output.status.success() {
			return Err(QueryError::Failed {
				program: self.program.clone(),
				status: output.status,
				stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
			});
		}
		parse_pod_list(&output.stdout)
	}
}

#[derive(Deserialize)]
struct PodList {
	#[serde(default)]
	items: Vec<Pod>,
}

#[derive(Deserialize)]
struct Pod {
	metadata: ObjectMeta,
	#[serde(default)]
	spec: PodSpec,
	#[serde(default)]
	status: PodStatus,
}

#[derive(Deserialize)]
struct ObjectMeta {
	#[serde(default)]
	name: String,
	#[serde(default)]
	uid: String,
	#[serde(default)]
	labels: Option<BTreeMap<String, String>>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct PodSpec {
	#[serde(default)]
	node_name: String,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct PodStatus {
	#[serde(default)]
	qos_class: String,
}

/// Decodes a `v1/PodList` as printed by `kubectl get pods --output json`.
pub fn parse_pod_list(json: &[u8]) -> Result<Vec<Workload>, QueryError> {
	let list: PodList = serde_json::from_slice(json)?;
	Ok(list
		.items
		.into_iter()
		.map(|pod| Workload {
			uid: pod.metadata.uid,
			name: pod.metadata.name,
			node: pod.spec.node_name,
			labels: pod.metadata.labels.unwrap_or_default(),
			qos_class: pod.status.qos_class,
		})
		.collect())
}
