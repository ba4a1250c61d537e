//! Service layer: conversion math, the transaction ledger, menu rendering,
//! usage aggregation, and the update router that ties them together.

pub mod analytics;
pub mod convert;
pub mod ledger;
pub mod menu;
pub mod router;
