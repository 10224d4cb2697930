// We follow the same basic approach as most of the ecosystem: a public `Error`
// type that wraps a private `ErrorKind`. The `gridbin_nostd_internal` crate
// still reports `&'static str` errors; those get wrapped by `Error::internal`.
//
// None of the "expected" data conditions (NaN values, null values, ordinals
// outside the configured domain) are errors. They are routed to reserved bins.

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
}

/// The underlying internal error type
#[non_exhaustive]
#[derive(Clone, Debug)]
enum ErrorKind {
    /// An attached buffer isn't one-dimensional
    BufferShape(BufferShapeError),
    /// A buffer's memory can't be interpreted as described
    BufferLayout(BufferLayoutError),
    /// An attached buffer's element width doesn't match the binner
    ItemSize(ItemSizeError),
    /// A thread id lies outside of `[0, n_threads)`
    ThreadIndex(ThreadIndexError),
    /// Binning was requested before any data was attached to a thread
    MissingData(MissingDataError),
    /// The requested element range exceeds an attached buffer
    DataRange(DataRangeError),
    /// The output buffer can't hold the requested range
    OutputLength(OutputLengthError),
    /// An integer lies outside of the acceptable range of values
    IntegerRange(IntegerRangeError),
    /// The total number of bins in a grid can't be represented
    GridOverflow(GridOverflowError),
    /// Scaling a bin index by the stride can't be represented
    StrideOverflow(StrideOverflowError),
    /// Wraps the stringly errors from `gridbin_nostd_internal`
    Internal(InternalError),
}

// define constructor methods for Error
impl Error {
    /// produce an error indicating that a buffer isn't one-dimensional
    pub(crate) fn buffer_shape(who: &'static str, ndim: usize) -> Self {
        Error {
            kind: ErrorKind::BufferShape(BufferShapeError { who, ndim }),
        }
    }

    /// produce an error indicating that a buffer's memory doesn't match its
    /// description (or isn't contiguous)
    pub(crate) fn buffer_layout(who: &'static str, what: &'static str) -> Self {
        Error {
            kind: ErrorKind::BufferLayout(BufferLayoutError { who, what }),
        }
    }

    /// produce an error indicating that a buffer's element width doesn't
    /// match the configured element type
    pub(crate) fn item_size(expected_name: &'static str, expected: usize, actual: usize) -> Self {
        Error {
            kind: ErrorKind::ItemSize(ItemSizeError {
                expected_name,
                expected,
                actual,
            }),
        }
    }

    /// produce an error indicating that a thread id is out of bounds
    pub(crate) fn thread_index(thread: usize, n_threads: usize) -> Self {
        Error {
            kind: ErrorKind::ThreadIndex(ThreadIndexError { thread, n_threads }),
        }
    }

    /// produce an error indicating that no data is attached to `thread`
    pub(crate) fn missing_data(thread: usize) -> Self {
        Error {
            kind: ErrorKind::MissingData(MissingDataError { thread }),
        }
    }

    /// produce an error indicating that `[offset, offset + length)` exceeds
    /// the length of an attached buffer
    pub(crate) fn data_range(
        who: &'static str,
        thread: usize,
        offset: usize,
        length: usize,
        available: usize,
    ) -> Self {
        Error {
            kind: ErrorKind::DataRange(DataRangeError {
                who,
                thread,
                offset,
                length,
                available,
            }),
        }
    }

    /// produce an error indicating that the output can't hold `required`
    /// entries
    pub(crate) fn output_length(required: usize, actual: usize) -> Self {
        Error {
            kind: ErrorKind::OutputLength(OutputLengthError { required, actual }),
        }
    }

    /// produce an error indicating that an integer lies outside the acceptable
    /// range of values
    pub(crate) fn integer_range(
        description: &'static str,
        actual: i64,
        min_val: i64,
        max_val: i64,
    ) -> Self {
        Error {
            kind: ErrorKind::IntegerRange(IntegerRangeError {
                description,
                actual,
                min_val,
                max_val,
            }),
        }
    }

    /// produce an error indicating that the product of the grid's shapes
    /// overflows
    pub(crate) fn grid_overflow(shapes: Vec<u64>) -> Self {
        Error {
            kind: ErrorKind::GridOverflow(GridOverflowError { shapes }),
        }
    }

    /// produce an error indicating that `(shape - 1) * stride` overflows
    pub(crate) fn stride_overflow(stride: u64, shape: u64) -> Self {
        Error {
            kind: ErrorKind::StrideOverflow(StrideOverflowError { stride, shape }),
        }
    }

    /// wraps an internal error string
    pub(crate) fn internal(message: &'static str) -> Self {
        Error {
            kind: ErrorKind::Internal(InternalError(message)),
        }
    }

    /// Returns `true` for errors caused by a bad configuration or a bad
    /// buffer (as opposed to a bad thread id or element range)
    pub fn is_configuration(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::BufferShape(_)
                | ErrorKind::BufferLayout(_)
                | ErrorKind::ItemSize(_)
                | ErrorKind::IntegerRange(_)
        )
    }

    /// Returns `true` for out-of-bounds errors (thread ids, element ranges,
    /// output lengths and strides) and for binning a thread with no attached
    /// data
    pub fn is_bounds(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::ThreadIndex(_)
                | ErrorKind::MissingData(_)
                | ErrorKind::DataRange(_)
                | ErrorKind::OutputLength(_)
                | ErrorKind::StrideOverflow(_)
        )
    }
}

impl std::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        self.kind.fmt(f)
    }
}

impl std::error::Error for ErrorKind {}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match *self {
            ErrorKind::BufferShape(ref err) => err.fmt(f),
            ErrorKind::BufferLayout(ref err) => err.fmt(f),
            ErrorKind::ItemSize(ref err) => err.fmt(f),
            ErrorKind::ThreadIndex(ref err) => err.fmt(f),
            ErrorKind::MissingData(ref err) => err.fmt(f),
            ErrorKind::DataRange(ref err) => err.fmt(f),
            ErrorKind::OutputLength(ref err) => err.fmt(f),
            ErrorKind::IntegerRange(ref err) => err.fmt(f),
            ErrorKind::GridOverflow(ref err) => err.fmt(f),
            ErrorKind::StrideOverflow(ref err) => err.fmt(f),
            ErrorKind::Internal(ref err) => err.fmt(f),
        }
    }
}

#[derive(Clone, Debug)]
struct BufferShapeError {
    who: &'static str,
    ndim: usize,
}

impl std::error::Error for BufferShapeError {}

impl core::fmt::Display for BufferShapeError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let BufferShapeError { who, ndim } = self;
        write!(f, "expected a 1d {who} buffer, got {ndim} dimensions")
    }
}

#[derive(Clone, Debug)]
struct BufferLayoutError {
    who: &'static str,
    what: &'static str,
}

impl std::error::Error for BufferLayoutError {}

impl core::fmt::Display for BufferLayoutError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let BufferLayoutError { who, what } = self;
        write!(f, "problem with the {who} buffer: {what}")
    }
}

#[derive(Clone, Debug)]
struct ItemSizeError {
    expected_name: &'static str,
    expected: usize,
    actual: usize,
}

impl std::error::Error for ItemSizeError {}

impl core::fmt::Display for ItemSizeError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "itemsize of data ({} bytes) and binner ({}, {} bytes) are not equal",
            self.actual, self.expected_name, self.expected
        )
    }
}

#[derive(Clone, Debug)]
struct ThreadIndexError {
    thread: usize,
    n_threads: usize,
}

impl std::error::Error for ThreadIndexError {}

impl core::fmt::Display for ThreadIndexError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "thread {} is out of bounds, the binner was configured for {} threads",
            self.thread, self.n_threads
        )
    }
}

#[derive(Clone, Debug)]
struct MissingDataError {
    thread: usize,
}

impl std::error::Error for MissingDataError {}

impl core::fmt::Display for MissingDataError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "no data is attached to thread {}", self.thread)
    }
}

#[derive(Clone, Debug)]
struct DataRangeError {
    who: &'static str,
    thread: usize,
    offset: usize,
    length: usize,
    available: usize,
}

impl std::error::Error for DataRangeError {}

impl core::fmt::Display for DataRangeError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "elements [{}, {}+{}) exceed the {} buffer attached to thread {}, \
             which holds {} elements",
            self.offset, self.offset, self.length, self.who, self.thread, self.available
        )
    }
}

#[derive(Clone, Debug)]
struct OutputLengthError {
    required: usize,
    actual: usize,
}

impl std::error::Error for OutputLengthError {}

impl core::fmt::Display for OutputLengthError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "the output holds {} entries, but at least {} are required",
            self.actual, self.required
        )
    }
}

/// An error that occurs when an integer lies outside of the acceptable
/// range of values
#[derive(Clone, Debug)]
struct IntegerRangeError {
    description: &'static str,
    actual: i64,
    min_val: i64,
    max_val: i64,
}

impl std::error::Error for IntegerRangeError {}

impl core::fmt::Display for IntegerRangeError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "{} has a value of {}. The value should be no less than {} and \
             not exceed {}",
            self.description, self.actual, self.min_val, self.max_val
        )
    }
}

#[derive(Clone, Debug)]
struct GridOverflowError {
    shapes: Vec<u64>,
}

impl std::error::Error for GridOverflowError {}

impl core::fmt::Display for GridOverflowError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "a grid with the shapes {:?} holds more bins than a u64 can index",
            self.shapes
        )
    }
}

#[derive(Clone, Debug)]
struct StrideOverflowError {
    stride: u64,
    shape: u64,
}

impl std::error::Error for StrideOverflowError {}

impl core::fmt::Display for StrideOverflowError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "a stride of {} overflows a u64 for a binner with {} bins",
            self.stride, self.shape
        )
    }
}

#[derive(Clone)]
struct InternalError(&'static str);

impl std::error::Error for InternalError {}

impl core::fmt::Display for InternalError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl core::fmt::Debug for InternalError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Debug::fmt(&self.0, f)
    }
}
