use std::sync::Arc;

use chrono::Duration;
use test_utils::{builder::TestBuilder, error::TestError};

use crate::server::{data::domain::ApprovedDomains, util::clock::ManualClock};

mod is_allowed_origin;
mod is_approved;
mod load;
