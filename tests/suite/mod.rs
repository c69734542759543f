mod config;
mod gemini;
mod sequence;
mod session;
