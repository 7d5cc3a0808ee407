/// Inbound ports (Driving ports) - Use case interfaces
mod bom_conversion_port;

pub use bom_conversion_port::BomConversionPort;
