mod gemini;
mod helpers;
mod history;
mod orchestrator;
mod studio;
