// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

mod from;
pub use from::*;

mod copy;
pub use copy::*;

mod arg;
pub use arg::*;

mod label;
pub use label::*;

mod env;
pub use env::*;

mod run;
pub use run::*;

mod entrypoint;
pub use entrypoint::*;

mod cmd;
pub use cmd::*;

mod healthcheck;
pub use healthcheck::*;

mod onbuild;
pub use onbuild::*;

mod misc;
pub use misc::*;
