// SPDX-License-Identifier: Apache-2.0

//! Compile-time configuration validation
//!
//! This module contains compile-time checks to ensure that mutually exclusive
//! features are not enabled simultaneously.

// Compile-time checks for mutually exclusive integer width features

// If none were selected that's an error
#[cfg(not(any(feature = "int16", feature = "int32", feature = "int64")))]
compile_error!("No integer width features selected: choose one of 'int16', 'int32', or 'int64'");

#[cfg(all(feature = "int32", feature = "int64"))]
compile_error!(
    "Cannot enable both 'int32' and 'int64' features simultaneously: choose one integer width"
);

#[cfg(all(feature = "int16", feature = "int32"))]
compile_error!(
    "Cannot enable both 'int16' and 'int32' features simultaneously: choose one integer width"
);

#[cfg(all(feature = "int16", feature = "int64"))]
compile_error!(
    "Cannot enable both 'int16' and 'int64' features simultaneously: choose one integer width"
);

// Compile-time checks for mutually exclusive slot id widths
#[cfg(not(any(feature = "slot8", feature = "slot16", feature = "slot32")))]
compile_error!("No slot id width selected: choose one of 'slot8', 'slot16', or 'slot32'");

#[cfg(all(feature = "slot8", feature = "slot16"))]
compile_error!("Cannot enable both 'slot8' and 'slot16' features simultaneously");

#[cfg(all(feature = "slot8", feature = "slot32"))]
compile_error!("Cannot enable both 'slot8' and 'slot32' features simultaneously");

#[cfg(all(feature = "slot16", feature = "slot32"))]
compile_error!("Cannot enable both 'slot16' and 'slot32' features simultaneously");
