// SPDX-License-Identifier: MIT

pub mod auth;
pub mod security;
