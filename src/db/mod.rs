// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistence layer (credential record on disk).

pub mod credentials;

pub use credentials::CredentialStore;
