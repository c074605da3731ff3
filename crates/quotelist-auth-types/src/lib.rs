//! Credential codecs for the quotelist service: the session JWT, the
//! one-time-passcode token, and the session cookie builders.

pub mod cookie;
pub mod otp;
pub mod token;
