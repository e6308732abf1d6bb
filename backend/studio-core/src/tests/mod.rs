mod artifact;
mod classifier;
mod config;
mod gemini_wire;
mod orchestrator;
