use canbus_rs::constants::{
    REPLY_ID_DISTANCE, REPLY_ID_MOTOR_ECHO, REPLY_ID_ORIENTATION, REPLY_ID_WIND_SPEED,
};
use canbus_rs::logging::log_error;
use canbus_rs::{
    decode, init_logger, log_info, BusSession, CanBusError, CanBusFrame, DecodedReading,
    SensorChannel, SessionConfig,
};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "canbus-cli")]
#[command(about = "CLI front end for the CAN sensor session")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll one sensor channel and log its readings until Ctrl-C.
    Monitor {
        #[arg(value_parser = parse_channel)]
        channel: SensorChannel,
        #[arg(short, long, default_value = "can0")]
        interface: String,
        /// Commanded motor speed (0-255) carried by distance/anemometer polls.
        #[arg(short, long, default_value = "0")]
        speed: u8,
    },
    /// Decode one frame offline: identifier in hex, payload as a hex string.
    Decode { id: String, data: String },
}

fn parse_channel(s: &str) -> Result<SensorChannel, String> {
    s.parse()
}

#[tokio::main]
async fn main() -> Result<(), CanBusError> {
    init_logger();

    let cli = Cli::parse();
    match cli.command {
        Commands::Monitor {
            channel,
            interface,
            speed,
        } => {
            let mut session = BusSession::open(&interface, SessionConfig::default());
            register_display_sinks(&session);
            session.set_commanded_speed(speed).await;
            session.activate(channel);

            if let Err(e) = tokio::signal::ctrl_c().await {
                log_error(&format!("signal wait failed: {e}"));
            }
            session.shutdown().await;
        }
        Commands::Decode { id, data } => {
            let id = u32::from_str_radix(id.trim_start_matches("0x"), 16)
                .map_err(|_| CanBusError::InvalidFrame(format!("invalid identifier '{id}'")))?;
            let payload = hex::decode(&data)
                .map_err(|_| CanBusError::InvalidFrame(format!("invalid hex payload '{data}'")))?;
            let frame = CanBusFrame::new(id, payload)?;
            println!("{:?}", decode(&frame)?);
        }
    }

    Ok(())
}

/// One logging sink per reply identifier, mirroring what the dashboard
/// widgets show: IMU angles in degrees, distance and echo payloads as hex,
/// wind speed in RPM.
fn register_display_sinks(session: &BusSession) {
    session.register_sink(
        REPLY_ID_ORIENTATION,
        Box::new(|reading: &DecodedReading| -> Result<(), CanBusError> {
            if let DecodedReading::Orientation { roll, pitch, yaw } = reading {
                // The decoded radians come from a raw value in hundredths of
                // a degree, so the display divides by 100 on the way back.
                log_info(&format!(
                    "MPU9250 -> roll: {:.2}°, pitch: {:.2}°, yaw: {:.2}°",
                    roll.to_degrees() / 100.0,
                    pitch.to_degrees() / 100.0,
                    yaw.to_degrees() / 100.0
                ));
            }
            Ok(())
        }),
    );
    session.register_sink(
        REPLY_ID_DISTANCE,
        Box::new(|reading: &DecodedReading| -> Result<(), CanBusError> {
            if let DecodedReading::Distance(bytes) = reading {
                log_info(&format!("VL6180X data: {}", hex::encode(bytes)));
            }
            Ok(())
        }),
    );
    session.register_sink(
        REPLY_ID_MOTOR_ECHO,
        Box::new(|reading: &DecodedReading| -> Result<(), CanBusError> {
            if let DecodedReading::MotorSpeedEcho(bytes) = reading {
                log_info(&format!("anemometer data: {}", hex::encode(bytes)));
            }
            Ok(())
        }),
    );
    session.register_sink(
        REPLY_ID_WIND_SPEED,
        Box::new(|reading: &DecodedReading| -> Result<(), CanBusError> {
            if let DecodedReading::WindSpeed { rpm } = reading {
                log_info(&format!("windmill speed: {rpm} RPM"));
            }
            Ok(())
        }),
    );
}
