pub mod flow_meter;
