// CDP Domain type definitions
// Only the Network domain's WebSocket events are consumed by the capture core

pub mod network;
