// (C) Copyright 2019-2020 Hewlett Packard Enterprise Development LP

use std::process;

use clap::Parser;

use docker_lint::cli::{self, Cli};

fn main() {
  env_logger::init();

  let code = cli::run(Cli::parse());
  process::exit(code);
}
