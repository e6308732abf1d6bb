mod builder;
mod deserialize;
