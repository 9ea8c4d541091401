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

//! Typed navigation failures.

use crate::state::{AttemptedRedirect, State};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

/// Stable failure codes surfaced by the router.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorCode {
    NotStarted,
    AlreadyStarted,
    RouteNotFound,
    SameStates,
    CannotDeactivate,
    CannotActivate,
    TransitionErr,
    Cancelled,
    RouterDisposed,
    DuplicateListener,
    ListenerLimit,
    MaxEventDepth,
    InvalidHandler,
    HookLimit,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::NotStarted => "NOT_STARTED",
            ErrorCode::AlreadyStarted => "ALREADY_STARTED",
            ErrorCode::RouteNotFound => "ROUTE_NOT_FOUND",
            ErrorCode::SameStates => "SAME_STATES",
            ErrorCode::CannotDeactivate => "CANNOT_DEACTIVATE",
            ErrorCode::CannotActivate => "CANNOT_ACTIVATE",
            ErrorCode::TransitionErr => "TRANSITION_ERR",
            ErrorCode::Cancelled => "CANCELLED",
            ErrorCode::RouterDisposed => "ROUTER_DISPOSED",
            ErrorCode::DuplicateListener => "DUPLICATE_LISTENER",
            ErrorCode::ListenerLimit => "LISTENER_LIMIT",
            ErrorCode::MaxEventDepth => "MAX_EVENT_DEPTH",
            ErrorCode::InvalidHandler => "INVALID_HANDLER",
            ErrorCode::HookLimit => "HOOK_LIMIT",
        }
    }
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Names that custom fields may not shadow.
pub const RESERVED_FIELDS: [&str; 11] = [
    "code",
    "message",
    "segment",
    "redirect",
    "attempted_redirect",
    "cause",
    "set_code",
    "set_field",
    "field",
    "has_field",
    "to_json",
];

/// Attempt to attach a custom field under a reserved name.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ReservedFieldError {
    pub field: String,
}

impl Display for ReservedFieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "field name is reserved: {}", self.field)
    }
}

impl Error for ReservedFieldError {}

/// A navigation failure.
///
/// `code` and `message` change only through [`RouterError::set_code`]. Custom
/// fields may be attached with [`RouterError::set_field`].
#[derive(Clone)]
pub struct RouterError {
    code: ErrorCode,
    message: String,
    segment: Option<String>,
    redirect: Option<Box<State>>,
    attempted_redirect: Option<AttemptedRedirect>,
    cause: Option<Arc<dyn Error + Send + Sync>>,
    fields: BTreeMap<String, Value>,
}

impl RouterError {
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            message: code.as_str().to_string(),
            segment: None,
            redirect: None,
            attempted_redirect: None,
            cause: None,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_segment(mut self, segment: impl Into<String>) -> Self {
        self.segment = Some(segment.into());
        self
    }

    /// Attaches a redirect target. Guards returning this are blocked, never redirected.
    pub fn with_redirect(mut self, redirect: State) -> Self {
        self.redirect = Some(Box::new(redirect));
        self
    }

    pub fn with_attempted_redirect(mut self, attempted: AttemptedRedirect) -> Self {
        self.attempted_redirect = Some(attempted);
        self
    }

    pub fn with_cause(mut self, cause: impl Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Arc::new(cause));
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn segment(&self) -> Option<&str> {
        self.segment.as_deref()
    }

    pub fn redirect(&self) -> Option<&State> {
        self.redirect.as_deref()
    }

    pub fn attempted_redirect(&self) -> Option<&AttemptedRedirect> {
        self.attempted_redirect.as_ref()
    }

    /// Re-codes the error. A message still equal to the old code follows the new one.
    pub fn set_code(&mut self, code: ErrorCode) {
        if self.message == self.code.as_str() {
            self.message = code.as_str().to_string();
        }
        self.code = code;
    }

    pub fn set_field(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<(), ReservedFieldError> {
        let key = key.into();
        if RESERVED_FIELDS.contains(&key.as_str()) {
            return Err(ReservedFieldError { field: key });
        }
        self.fields.insert(key, value.into());
        Ok(())
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn has_field(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        object.insert("code".to_string(), Value::from(self.code.as_str()));
        object.insert("message".to_string(), Value::from(self.message.clone()));
        if let Some(segment) = &self.segment {
            object.insert("segment".to_string(), Value::from(segment.clone()));
        }
        if let Some(redirect) = &self.redirect {
            object.insert(
                "redirect".to_string(),
                serde_json::to_value(redirect.as_ref()).unwrap_or(Value::Null),
            );
        }
        if let Some(attempted) = &self.attempted_redirect {
            object.insert(
                "attempted_redirect".to_string(),
                serde_json::to_value(attempted).unwrap_or(Value::Null),
            );
        }
        if let Some(cause) = &self.cause {
            object.insert("cause".to_string(), Value::from(cause.to_string()));
        }
        for (key, value) in &self.fields {
            object.insert(key.clone(), value.clone());
        }
        Value::Object(object)
    }
}

impl From<ErrorCode> for RouterError {
    fn from(code: ErrorCode) -> Self {
        RouterError::new(code)
    }
}

impl Debug for RouterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterError")
            .field("code", &self.code)
            .field("message", &self.message)
            .field("segment", &self.segment)
            .field("attempted_redirect", &self.attempted_redirect)
            .field("cause", &self.cause.as_ref().map(|cause| cause.to_string()))
            .finish_non_exhaustive()
    }
}

impl Display for RouterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.message == self.code.as_str() {
            write!(f, "{}", self.code)?;
        } else {
            write!(f, "{}: {}", self.code, self.message)?;
        }
        if let Some(segment) = &self.segment {
            write!(f, " (segment {segment})")?;
        }
        Ok(())
    }
}

impl Error for RouterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause
            .as_ref()
            .map(|cause| cause.as_ref() as &(dyn Error + 'static))
    }
}

/// Value raised by a panicking guard, middleware or listener.
#[derive(Debug, Clone)]
pub struct PanicError {
    pub message: String,
}

impl PanicError {
    pub(crate) fn from_payload(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(text) = payload.downcast_ref::<&str>() {
            (*text).to_string()
        } else if let Some(text) = payload.downcast_ref::<String>() {
            text.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self { message }
    }
}

impl Display for PanicError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "panicked: {}", self.message)
    }
}

impl Error for PanicError {}
