//! Constants used throughout the application

/// Number of landmarks produced by the BlazePose landmark model
pub const NUM_POSE_LANDMARKS: usize = 33;

/// Default frames per second assumption when the source does not report one
pub const DEFAULT_FPS: f64 = 30.0;

/// Seconds skipped at the start of a video while the lifter sets up
pub const DEFAULT_SETUP_SECONDS: f64 = 3.0;

/// An adult is roughly seven and a half heads tall
pub const HEAD_LENGTHS_PER_BODY: f64 = 7.5;

/// Knee angle mapped to 0% rep completion
pub const DEFAULT_ZERO_PERCENT_ANGLE: f64 = 15.0;
/// Knee angle mapped to 100% rep completion
pub const DEFAULT_FULL_PERCENT_ANGLE: f64 = 110.0;

/// Trajectory buffer capacity in frames
pub const DEFAULT_TRAJECTORY_CAPACITY: usize = 100;
/// Horizontal jump between consecutive plate centers that invalidates the path
pub const DEFAULT_JUMP_THRESHOLD_PX: i32 = 30;
/// Frames without a plate after which the path is discarded
pub const DEFAULT_GAP_THRESHOLD_FRAMES: u32 = 10;
/// Plausible plate diameter bounds as fractions of the frame width
pub const DEFAULT_MIN_DIAMETER_FRACTION: f64 = 0.05;
pub const DEFAULT_MAX_DIAMETER_FRACTION: f64 = 0.25;
/// Minimum distance between Hough circle centers
pub const DEFAULT_MIN_CENTER_DISTANCE_PX: f64 = 100.0;
/// Blur kernel applied before circle detection
pub const DEFAULT_BLUR_KERNEL: i32 = 5;

/// Orientation re-evaluation cadence during the opening window
pub const DEFAULT_RECHECK_INTERVAL_SECONDS: f64 = 1.0;
pub const DEFAULT_RECHECK_WINDOW_SECONDS: f64 = 3.0;

/// Landmarks below this visibility are treated as undetected
pub const DEFAULT_MIN_VISIBILITY: f32 = 0.5;

/// Path segment thickness scale, thicker towards the newest point
pub const PATH_THICKNESS_SCALE: f64 = 2.5;

/// Frame resolution envelope recommended for pose inference
pub const MIN_FRAME_WIDTH: i32 = 360;
pub const MIN_FRAME_HEIGHT: i32 = 480;
pub const MAX_FRAME_WIDTH: i32 = 720;
pub const MAX_FRAME_HEIGHT: i32 = 1280;

/// Numeric precision epsilon
pub const EPSILON: f64 = 1e-10;
