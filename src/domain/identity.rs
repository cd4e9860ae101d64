//! Process identity of the front end.

use std::fmt;

use serde::Serialize;

/// Host id reserved for the front end.
pub const FRONT_END_HOST_ID: u64 = 1;

/// Process name given to the front end.
pub const FRONT_END_PROCESS_NAME: &str = "nodelaunch-fe";

/// Identity of the front-end process, fixed once before the launch loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessIdentity {
    host_id: u64,
    host_name: String,
    process_name: String,
    pid: u32,
    pgid: i32,
}

impl ProcessIdentity {
    pub fn new(
        host_id: u64,
        host_name: impl Into<String>,
        process_name: impl Into<String>,
        pid: u32,
        pgid: i32,
    ) -> Self {
        Self {
            host_id,
            host_name: host_name.into(),
            process_name: process_name.into(),
            pid,
            pgid,
        }
    }

    #[must_use]
    pub const fn host_id(&self) -> u64 {
        self.host_id
    }

    #[must_use]
    pub fn host_name(&self) -> &str {
        &self.host_name
    }

    #[must_use]
    pub fn process_name(&self) -> &str {
        &self.process_name
    }

    #[must_use]
    pub const fn pid(&self) -> u32 {
        self.pid
    }

    #[must_use]
    pub const fn pgid(&self) -> i32 {
        self.pgid
    }
}

impl fmt::Display for ProcessIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{} (host id {}, pid {}, pgid {})",
            self.process_name, self.host_name, self.host_id, self.pid, self.pgid
        )
    }
}
