use std::sync::Arc;

use chrono::Duration;
use test_utils::{builder::TestBuilder, error::TestError, mock::MockService};

use crate::server::{
    data::port::PortRegistry,
    error::config::ConfigError,
    util::clock::ManualClock,
};

mod get_port;
mod get_ports;
