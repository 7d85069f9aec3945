#![allow(dead_code)]

pub mod publish_testkit;
