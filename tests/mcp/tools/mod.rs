mod config;
mod evaluate;
mod preprocess;
