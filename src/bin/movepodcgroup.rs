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

use clap::Parser;
use movepodcgroup::internal;
use movepodcgroup::Config;
use movepodcgroup::HostFs;
use movepodcgroup::KubectlQuery;
use movepodcgroup::Outcome;
use std::error::Error;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Moves the CPU control groups of a running pod to another scheduling class")]
struct Cli {
	/// Name of the pod. Only pods labelled qos=dynamic in the default namespace are considered.
	#[arg()]
	pod: String,

	/// Scheduling class to move the pod's containers into, relative to kubepods/burstable. Defaults to kubepods/burstable itself.
	#[arg()]
	target: Option<String>,
}

fn print_error(err: &dyn Error) {
	println!("Error: {err}");
	let mut source = err.source();
	while let Some(cause) = source {
		println!("  caused by: {cause}");
		source = cause.source();
	}
}

fn main() -> ExitCode {
	let args = Cli::parse();
	tracing_subscriber::fmt()
		.with_writer(std::io::stdout)
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("movepodcgroup=info")))
		.init();

	let config = Config::default();
	if let Err(err) = internal::os_check(&HostFs, &config) {
		print_error(&err);
		return ExitCode::FAILURE;
	}
	let target = args.target.as_deref().unwrap_or("");
	match movepodcgroup::run(&KubectlQuery::default(), &HostFs, &config, &args.pod, target) {
		Ok(Outcome::WorkloadNotFound { name }) => {
			println!("Pod {name} not found");
			ExitCode::SUCCESS
		}
		Ok(Outcome::CgroupNotFound { name, uid }) => {
			println!("Failed to find cgroup path for pod {name} ({uid})");
			ExitCode::SUCCESS
		}
		Ok(Outcome::Moved(report)) => {
			for container in report.containers.iter() {
				if container.already_in_place() {
					println!("{}: already in place", container.source);
				} else {
					println!(
						"{} -> {}: {} group(s), {} task(s) moved, {} failed",
						container.source,
						container.target,
						container.groups,
						container.moved,
						container.failures.len()
					);
				}
			}
			println!("Success");
			ExitCode::SUCCESS
		}
		Err(err) => {
			print_error(&err);
			println!("Failure");
			ExitCode::FAILURE
		}
	}
}

#[test]
fn test_cli() {
	fn cli(input: &str) -> Result<Cli, String> {
		Cli::try_parse_from(shlex::split(input).unwrap()).map_err(|e| format!("{e}"))
	}
	insta::assert_debug_snapshot!(cli("movepodcgroup web-1"), @r###"
	Ok(
	    Cli {
	        pod: "web-1",
	        target: None,
	    },
	)
	"###);
	insta::assert_debug_snapshot!(cli("movepodcgroup web-1 guaranteed"), @r###"
	Ok(
	    Cli {
	        pod: "web-1",
	        target: Some(
	            "guaranteed",
	        ),
	    },
	)
	"###);
	assert!(cli("movepodcgroup").is_err());
	assert!(cli("movepodcgroup web-1 guaranteed extra").is_err());
	assert!(cli("movepodcgroup --flag web-1").is_err());
}
