//! Тексты меню и справки

pub const BANNER: &str = concat!(
    "\r\n\r\n9DOF IMU Firmware v",
    env!("CARGO_PKG_VERSION"),
    "\r\n==========================\r\n"
);

pub const MENU_ITEMS: &[&str] = &[
    "[1]Accelerometer: ADXL345",
    "[2]Magnetometer: HMC5883",
    "[3]Gyroscope: ITG-3200",
    "[4]Raw Output",
];

/// Продолжается текущей скоростью
pub const MENU_BAUD: &str = "[5]Change Baud Rate: ";

pub const MENU_FOOTER: &[&str] = &["[Ctrl+z]Toggle Autorun", "[?]Help"];

pub const BAUD_MENU_TITLE: &str = "\r\nBaud Rate Select Menu";

pub const HELP: &[&str] = &[
    "HELP MENU",
    "[1] send ascii 1 to get output from the accelerometer(x,y,z). Hit any key to return to menu.",
    "[2] send ascii 2 to get output from the magnetometer(x,y,z). Hit any key to return to menu.",
    "[3] send ascii 3 to get output from the gyroscope(x,y,z). Hit any key to return to menu.",
    "[4] send ascii 4 to get the raw output from all of the sensors. Hit any key to return to menu.",
    "*** Raw format '$accelx,accely,accelz,gyrox,gyroy,gyroz,magx,magy,magz#",
    "[5] send ascii 5 to get the 5 choices for baud rates. The new rate applies immediately. Hit any key to return to menu.",
    "[ctrl-p] ctrl-p tests the accelerometer, magnetometer and gyroscope.",
    "[ctrl-z] ctrl+z at anytime will toggle between raw output and the menu",
];
