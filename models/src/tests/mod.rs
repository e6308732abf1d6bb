mod history_item;
mod job;
