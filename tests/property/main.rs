mod deps;
mod scheduler;
