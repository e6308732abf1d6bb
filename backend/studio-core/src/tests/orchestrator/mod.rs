mod poll;
mod tracker;
