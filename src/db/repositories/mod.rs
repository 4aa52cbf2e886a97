mod component_values;
mod machines;
mod status_logs;
