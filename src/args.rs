// ── Argument coercion ─────────────────────────────────────────────────────────
//
// Every native argument is one machine word.  `Arg` is the closed set of
// values that may be passed; `IntoWords` is the strategy turning a whole
// argument list into words, so raw-word callers and typed callers share the
// same `Chain`.

use std::ffi::c_void;

/// Most arguments a single native call accepts.
pub const MAX_ARGS: usize = 15;

/// One argument to a native entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg {
    /// Already a machine word; passed through untouched.
    Word(usize),
    /// Signed integer; sign-extended or truncated to word width.
    Int(i64),
    /// Unsigned integer; truncated to word width.
    Uint(u64),
    /// `true` → 1, `false` → 0.
    Bool(bool),
    /// Address of the pointee.
    Ptr(*const c_void),
    /// Absent value; always 0.
    Null,
}

impl Arg {
    /// Coerce to a machine word.
    pub fn to_word(self) -> usize {
        match self {
            Arg::Word(w) => w,
            Arg::Int(i) => i as isize as usize,
            Arg::Uint(u) => u as usize,
            Arg::Bool(b) => usize::from(b),
            Arg::Ptr(p) => p as usize,
            Arg::Null => 0,
        }
    }
}

macro_rules! from_signed {
    ($($t:ty),*) => {$(
        impl From<$t> for Arg {
            fn from(v: $t) -> Self { Arg::Int(v as i64) }
        }
    )*};
}

macro_rules! from_unsigned {
    ($($t:ty),*) => {$(
        impl From<$t> for Arg {
            fn from(v: $t) -> Self { Arg::Uint(v as u64) }
        }
    )*};
}

from_signed!(i8, i16, i32, i64, isize);
from_unsigned!(u8, u16, u32, u64);

// `usize` is the word type itself.
impl From<usize> for Arg {
    fn from(v: usize) -> Self {
        Arg::Word(v)
    }
}

impl From<bool> for Arg {
    fn from(v: bool) -> Self {
        Arg::Bool(v)
    }
}

impl From<()> for Arg {
    fn from(_: ()) -> Self {
        Arg::Null
    }
}

impl<T> From<*const T> for Arg {
    fn from(p: *const T) -> Self {
        Arg::Ptr(p.cast())
    }
}

impl<T> From<*mut T> for Arg {
    fn from(p: *mut T) -> Self {
        Arg::Ptr(p.cast_const().cast())
    }
}

impl<T> From<&T> for Arg {
    fn from(r: &T) -> Self {
        Arg::Ptr((r as *const T).cast())
    }
}

impl<T> From<&mut T> for Arg {
    fn from(r: &mut T) -> Self {
        Arg::Ptr((r as *const T).cast())
    }
}

impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(v: Option<T>) -> Self {
        v.map_or(Arg::Null, Into::into)
    }
}

/// Build an `[Arg; N]` from heterogeneous values.
///
/// ```
/// use wincall::{args, Arg};
/// let flag = true;
/// let a = args![0u32, -1i32, flag, ()];
/// assert_eq!(a[2], Arg::Bool(true));
/// ```
#[macro_export]
macro_rules! args {
    () => { [$crate::Arg::Null; 0] };
    ($($v:expr),+ $(,)?) => { [$($crate::Arg::from($v)),+] };
}

// ── Coercion strategy ─────────────────────────────────────────────────────────

/// Turns a whole argument list into machine words.
pub trait IntoWords {
    fn into_words(self) -> Vec<usize>;
}

impl IntoWords for () {
    fn into_words(self) -> Vec<usize> {
        Vec::new()
    }
}

impl IntoWords for &[Arg] {
    fn into_words(self) -> Vec<usize> {
        self.iter().map(|a| a.to_word()).collect()
    }
}

impl<const N: usize> IntoWords for [Arg; N] {
    fn into_words(self) -> Vec<usize> {
        self.as_slice().into_words()
    }
}

impl<const N: usize> IntoWords for &[Arg; N] {
    fn into_words(self) -> Vec<usize> {
        self.as_slice().into_words()
    }
}

impl IntoWords for Vec<Arg> {
    fn into_words(self) -> Vec<usize> {
        self.as_slice().into_words()
    }
}

impl IntoWords for &[usize] {
    fn into_words(self) -> Vec<usize> {
        self.to_vec()
    }
}

impl<const N: usize> IntoWords for [usize; N] {
    fn into_words(self) -> Vec<usize> {
        self.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_coerces_to_its_address() {
        let x = 7u32;
        let p: *const u32 = &x;
        assert_eq!(Arg::from(p).to_word(), p as usize);
        assert_eq!(Arg::from(&x).to_word(), p as usize);
    }

    #[test]
    fn mutable_pointer_coerces_to_its_address() {
        let mut x = [0u16; 4];
        let addr = x.as_ptr() as usize;
        assert_eq!(Arg::from(x.as_mut_ptr()).to_word(), addr);
    }

    #[test]
    fn booleans_coerce_to_one_and_zero() {
        assert_eq!(Arg::from(true).to_word(), 1);
        assert_eq!(Arg::from(false).to_word(), 0);
    }

    #[test]
    fn absent_values_coerce_to_zero() {
        assert_eq!(Arg::Null.to_word(), 0);
        assert_eq!(Arg::from(()).to_word(), 0);
        assert_eq!(Arg::from(None::<&u8>).to_word(), 0);
        assert_eq!(Arg::from(Some(9u8)).to_word(), 9);
    }

    #[test]
    fn signed_integers_keep_their_value() {
        assert_eq!(Arg::from(-1i32).to_word(), usize::MAX);
        assert_eq!(Arg::from(-2i8).to_word() as isize, -2);
        assert_eq!(Arg::from(i16::MIN).to_word() as isize, i16::MIN as isize);
        assert_eq!(Arg::from(42i64).to_word(), 42);
    }

    #[test]
    fn unsigned_integers_keep_their_value() {
        assert_eq!(Arg::from(0xFFu8).to_word(), 0xFF);
        assert_eq!(Arg::from(u32::MAX).to_word(), u32::MAX as usize);
        assert_eq!(Arg::from(123usize), Arg::Word(123));
    }

    #[test]
    fn macro_mixes_kinds() {
        let words = args![1u8, -1i64, false, ()].into_words();
        assert_eq!(words, vec![1, usize::MAX, 0, 0]);
    }

    #[test]
    fn empty_macro_yields_no_words() {
        let words = args![].into_words();
        assert!(words.is_empty());
        assert!(().into_words().is_empty());
    }

    #[test]
    fn raw_words_pass_through() {
        let raw: &[usize] = &[3, 0, usize::MAX];
        assert_eq!(raw.into_words(), vec![3, 0, usize::MAX]);
        assert_eq!([5usize, 6].into_words(), vec![5, 6]);
    }
}
