/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! Canonical structured field keys and value-format helpers.

use crate::state::State;

pub const EVENT: &str = "event";
pub const COMPONENT: &str = "component";
pub const TRANSITION_ID: &str = "transition_id";
pub const SEGMENT: &str = "segment";
pub const TO_STATE: &str = "to_state";
pub const FROM_STATE: &str = "from_state";
pub const PHASE: &str = "phase";
pub const COUNT: &str = "count";
pub const LIMIT: &str = "limit";
pub const ERR: &str = "err";

pub const NONE: &str = "none";

pub fn format_state_name(state: Option<&State>) -> &str {
    state.map(State::name).unwrap_or(NONE)
}

#[cfg(test)]
mod tests {
    use super::{format_state_name, NONE};
    use crate::state::State;

    #[test]
    fn format_state_name_falls_back_when_absent() {
        let state = State::new("home", "/");

        assert_eq!(format_state_name(Some(&state)), "home");
        assert_eq!(format_state_name(None), NONE);
    }
}
