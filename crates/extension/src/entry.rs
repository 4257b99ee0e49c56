//! The exported `sqlite3_spellfix_init` entry point and process-wide
//! auto-registration.

use std::os::raw::{c_char, c_int};

use rusqlite::{Connection, ffi};

#[cfg(not(feature = "loadable_extension"))]
use std::sync::{Mutex, PoisonError};

#[cfg(not(feature = "loadable_extension"))]
static AUTO_REGISTERED: Mutex<bool> = Mutex::new(false);

/// Result code carried by `err`, `SQLITE_ERROR` when it has none.
fn error_code(err: &rusqlite::Error) -> c_int {
    err.sqlite_error().map_or(ffi::SQLITE_ERROR, |e| e.extended_code)
}

/// Store `message` in `*pz_err_msg` using `SQLite`'s allocator.
///
/// # Safety
///
/// `pz_err_msg` must be null or valid for a pointer write.
#[cfg(not(feature = "loadable_extension"))]
unsafe fn set_error_message(pz_err_msg: *mut *mut c_char, message: &str) {
    if pz_err_msg.is_null() {
        return;
    }
    let bytes = message.as_bytes();
    // SAFETY: the buffer has room for the message and its terminator.
    unsafe {
        let buf = ffi::sqlite3_malloc64(bytes.len() as u64 + 1).cast::<u8>();
        if buf.is_null() {
            return;
        }
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), buf, bytes.len());
        *buf.add(bytes.len()) = 0;
        *pz_err_msg = buf.cast::<c_char>();
    }
}

/// Register spellfix on the raw connection `db`.
///
/// # Safety
///
/// `db` must be an open connection handle.
#[cfg(not(feature = "loadable_extension"))]
unsafe fn init(db: *mut ffi::sqlite3) -> rusqlite::Result<()> {
    // SAFETY: checked non-null by the caller, the handle stays owned by SQLite.
    let conn = unsafe { Connection::from_handle(db)? };
    crate::register(&conn)
}

/// Entry point called by `SQLite` when the extension is loaded.
///
/// Registers the `spellfix1` module and its helper functions on `db` and
/// returns `SQLITE_OK`. On failure returns the error code and, when
/// `pz_err_msg` is non-null, stores a message allocated with
/// `sqlite3_malloc` that the caller frees with `sqlite3_free`. `p_api` is
/// ignored because `SQLite` is linked statically.
///
/// # Safety
///
/// `db` must be null or an open connection and `pz_err_msg` must be null or
/// valid for a pointer write.
#[cfg(not(feature = "loadable_extension"))]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sqlite3_spellfix_init(
    db: *mut ffi::sqlite3,
    pz_err_msg: *mut *mut c_char,
    _p_api: *const ffi::sqlite3_api_routines,
) -> c_int {
    if db.is_null() {
        // SAFETY: forwarded caller contract.
        unsafe { set_error_message(pz_err_msg, "spellfix1: null database handle") };
        return ffi::SQLITE_MISUSE;
    }

    // SAFETY: `db` is non-null and open per the caller contract.
    let outcome = std::panic::catch_unwind(|| unsafe { init(db) });
    let (code, message) = match outcome {
        Ok(Ok(())) => return ffi::SQLITE_OK,
        Ok(Err(err)) => (error_code(&err), format!("spellfix1: {err}")),
        Err(_) => (ffi::SQLITE_INTERNAL, "spellfix1: panic during initialisation".to_owned()),
    };
    tracing::warn!(code, %message, "spellfix1 initialisation failed");
    // SAFETY: forwarded caller contract.
    unsafe { set_error_message(pz_err_msg, &message) };
    code
}

#[cfg(feature = "loadable_extension")]
#[allow(clippy::unnecessary_wraps)]
fn extension_init(db: Connection) -> rusqlite::Result<bool> {
    crate::register(&db).inspect_err(|err| {
        tracing::warn!(code = error_code(err), "spellfix1 initialisation failed: {err}");
    })?;
    Ok(false)
}

/// Entry point called by `load_extension`.
///
/// Initialises the API routine table from `p_api` and registers the
/// `spellfix1` module and its helper functions on `db`.
///
/// # Safety
///
/// Must only be called by `SQLite` with the arguments it passes to
/// extension entry points.
#[cfg(feature = "loadable_extension")]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sqlite3_spellfix_init(
    db: *mut ffi::sqlite3,
    pz_err_msg: *mut *mut c_char,
    p_api: *mut ffi::sqlite3_api_routines,
) -> c_int {
    // SAFETY: forwarded caller contract.
    unsafe { Connection::extension_init2(db, pz_err_msg, p_api, extension_init) }
}

#[cfg(not(feature = "loadable_extension"))]
fn lock_registered() -> std::sync::MutexGuard<'static, bool> {
    AUTO_REGISTERED.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Load spellfix into every connection opened after this call.
///
/// Safe to call multiple times; the entry point is only registered once.
///
/// # Errors
///
/// Returns an error if `sqlite3_auto_extension` fails.
#[cfg(not(feature = "loadable_extension"))]
#[allow(clippy::missing_transmute_annotations)]
pub fn auto() -> rusqlite::Result<()> {
    let mut registered = lock_registered();
    if *registered {
        return Ok(());
    }
    // SAFETY: the entry point has the signature SQLite expects.
    let rc = unsafe {
        ffi::sqlite3_auto_extension(Some(std::mem::transmute(sqlite3_spellfix_init as *const ())))
    };
    if rc != ffi::SQLITE_OK {
        return Err(rusqlite::Error::SqliteFailure(ffi::Error::new(rc), None));
    }
    *registered = true;
    tracing::info!("spellfix1 extension registered for new connections");
    Ok(())
}

/// Undo [`auto`]. Connections that are already open keep the extension.
///
/// Returns whether a registration was removed.
#[cfg(not(feature = "loadable_extension"))]
#[allow(clippy::missing_transmute_annotations)]
pub fn cancel() -> bool {
    let mut registered = lock_registered();
    if !*registered {
        return false;
    }
    // SAFETY: same pointer that was handed to sqlite3_auto_extension.
    let removed = unsafe {
        ffi::sqlite3_cancel_auto_extension(Some(std::mem::transmute(
            sqlite3_spellfix_init as *const (),
        )))
    } != 0;
    *registered = false;
    tracing::info!(removed, "spellfix1 auto-registration cancelled");
    removed
}
