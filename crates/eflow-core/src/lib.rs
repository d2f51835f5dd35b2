//! Job preparation for ECAL harness laser monitoring on HTCondor.

pub mod common;
pub mod domain;
pub mod modules;
