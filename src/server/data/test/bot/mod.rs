use std::sync::Arc;

use chrono::Duration;
use test_utils::{builder::TestBuilder, error::TestError, mock::MockService};

use crate::server::{data::bot::BotDirectory, util::clock::ManualClock};

mod list;
