mod disabled;
mod elasticsearch;
