mod common;
mod flow;
mod scoring;
