use crate::domain::ApplianceState;
use serde::Deserialize;

// GET /api/house?api-version=2
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HouseGet {
    pub floors: Vec<FloorGet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FloorGet {
    pub rooms: Vec<RoomGet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RoomGet {
    pub appliances: Vec<ApplianceGet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApplianceGet {
    pub id: String,
    pub name: String,
    pub state: ApplianceState,
}
