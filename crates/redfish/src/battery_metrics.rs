//! Metrics of a battery unit.

use redfish_core::common::Status;
use redfish_core::link::null_as_default;
use redfish_core::{Entity, Resource};
use serde::Deserialize;

/// A sensor reading embedded in another resource.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SensorExcerpt {
    /// URI of the sensor that provides this reading
    #[serde(rename = "DataSourceUri", default)]
    pub data_source_uri: Option<String>,
    /// Sensor value
    #[serde(rename = "Reading", default)]
    pub reading: Option<f64>,
}

/// A voltage sensor reading.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SensorVoltageExcerpt {
    /// URI of the sensor that provides this reading
    #[serde(rename = "DataSourceUri", default)]
    pub data_source_uri: Option<String>,
    /// Voltage, in volts
    #[serde(rename = "Reading", default)]
    pub reading: Option<f64>,
    /// Ratio of the peak to the RMS value
    #[serde(rename = "CrestFactor", default)]
    pub crest_factor: Option<f64>,
    /// Total harmonic distortion, in percent
    #[serde(rename = "THDPercent", default)]
    pub thd_percent: Option<f64>,
}

/// A current sensor reading.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SensorCurrentExcerpt {
    /// URI of the sensor that provides this reading
    #[serde(rename = "DataSourceUri", default)]
    pub data_source_uri: Option<String>,
    /// Current, in amperes
    #[serde(rename = "Reading", default)]
    pub reading: Option<f64>,
    /// Ratio of the peak to the RMS value
    #[serde(rename = "CrestFactor", default)]
    pub crest_factor: Option<f64>,
    /// Total harmonic distortion, in percent
    #[serde(rename = "THDPercent", default)]
    pub thd_percent: Option<f64>,
}

/// Metrics of a battery unit. Read-only.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatteryMetrics {
    /// Resource identity
    #[serde(flatten)]
    pub entity: Entity,
    /// OData type
    #[serde(rename = "@odata.type", default)]
    pub odata_type: String,
    /// Description of this resource
    #[serde(rename = "Description", default)]
    pub description: String,
    /// Per-cell voltages
    #[serde(rename = "CellVoltages", default, deserialize_with = "null_as_default")]
    pub cell_voltages: Vec<SensorVoltageExcerpt>,
    /// Number of cell voltages reported by the service
    #[serde(rename = "CellVoltages@odata.count", default)]
    pub cell_voltages_count: usize,
    /// Available charge, in percent
    #[serde(rename = "ChargePercent", default)]
    pub charge_percent: SensorExcerpt,
    /// Number of discharges the battery has sustained
    #[serde(rename = "DischargeCycles", default)]
    pub discharge_cycles: Option<f64>,
    /// Input current
    #[serde(rename = "InputCurrentAmps", default)]
    pub input_current_amps: SensorCurrentExcerpt,
    /// Input voltage
    #[serde(rename = "InputVoltage", default)]
    pub input_voltage: SensorVoltageExcerpt,
    /// Output currents, in the same order as `output_voltages`
    #[serde(rename = "OutputCurrentAmps", default, deserialize_with = "null_as_default")]
    pub output_current_amps: Vec<SensorCurrentExcerpt>,
    /// Number of output currents reported by the service
    #[serde(rename = "OutputCurrentAmps@odata.count", default)]
    pub output_current_amps_count: usize,
    /// Output voltages, in the same order as `output_current_amps`
    #[serde(rename = "OutputVoltages", default, deserialize_with = "null_as_default")]
    pub output_voltages: Vec<SensorVoltageExcerpt>,
    /// Number of output voltages reported by the service
    #[serde(rename = "OutputVoltages@odata.count", default)]
    pub output_voltages_count: usize,
    /// Status and health
    #[serde(rename = "Status", default)]
    pub status: Status,
    /// Stored charge, in ampere-hours
    #[serde(rename = "StoredChargeAmpHours", default)]
    pub stored_charge_amp_hours: SensorExcerpt,
    /// Stored energy, in watt-hours
    #[serde(rename = "StoredEnergyWattHours", default)]
    pub stored_energy_watt_hours: SensorExcerpt,
    /// Temperature, in degrees Celsius
    #[serde(rename = "TemperatureCelsius", default)]
    pub temperature_celsius: SensorExcerpt,
}

impl Resource for BatteryMetrics {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }
}
