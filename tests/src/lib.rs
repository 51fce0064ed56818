#![cfg(test)]

mod registry;
