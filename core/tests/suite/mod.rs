mod cancellation;
mod independence;
mod slow_path;
