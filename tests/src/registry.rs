mod lifecycle;
mod persistence;
