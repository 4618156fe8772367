//! Per-cell aligned storage that keeps neighboring values off one cache line.
//!
//! Packing N counters contiguously puts several on one cache line, and
//! concurrent writes from different workers then serialize at the coherency
//! level (false sharing). `AlignedArray` gives every cell its own aligned
//! allocation so each lands on its own line.

use std::alloc::{alloc, dealloc, handle_alloc_error, Layout};
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ops::{Index, IndexMut};
use std::ptr::{self, NonNull};

/// Size of a cache line on most modern CPUs
pub const CACHE_LINE_SIZE: usize = 64;

/// A fixed-size collection of independently allocated, aligned cells.
///
/// Resizing is destructive: all cells are freed and fresh default-valued
/// ones allocated. Cloning deep-copies every cell into new aligned storage.
///
/// # Examples
///
/// ```
/// use strand::AlignedArray;
///
/// let mut counters = AlignedArray::<u64>::new(4);
/// counters[2] = 7;
/// assert_eq!(counters[2], 7);
/// assert_eq!(counters.alignment(), 64);
/// ```
pub struct AlignedArray<T> {
    cells: Vec<NonNull<T>>,
    align: usize,
}

unsafe impl<T: Send> Send for AlignedArray<T> {}
unsafe impl<T: Sync> Sync for AlignedArray<T> {}

fn cell_layout<T>(align: usize) -> Layout {
    // Zero-sized T still gets a real allocation so cell addresses stay
    // distinct and aligned.
    Layout::from_size_align(mem::size_of::<T>().max(1), align)
        .expect("invalid cell layout")
}

fn alloc_raw<T>(align: usize) -> NonNull<T> {
    let layout = cell_layout::<T>(align);
    // Safety: layout has non-zero size.
    let ptr = unsafe { alloc(layout) };
    match NonNull::new(ptr.cast::<T>()) {
        Some(ptr) => ptr,
        None => handle_alloc_error(layout),
    }
}

impl<T: Default> AlignedArray<T> {
    /// Allocate `len` default-initialized cells, each on its own cache line.
    pub fn new(len: usize) -> Self {
        Self::with_alignment(len, CACHE_LINE_SIZE)
    }

    /// Allocate `len` default-initialized cells at the given byte boundary.
    ///
    /// The alignment must be a power of two; it is rounded up to `T`'s own
    /// minimum alignment if smaller.
    pub fn with_alignment(len: usize, align: usize) -> Self {
        assert!(align.is_power_of_two(), "alignment must be a power of two");
        let align = align.max(mem::align_of::<T>());

        let mut array = Self {
            cells: Vec::new(),
            align,
        };
        array.allocate(len);
        array
    }

    /// Free every cell and allocate `len` fresh default-valued ones.
    ///
    /// Previous values are not preserved; this is the documented contract,
    /// not an oversight.
    pub fn resize(&mut self, len: usize) {
        self.destroy();
        self.allocate(len);
    }

    /// [`resize`](AlignedArray::resize) with a new alignment for the fresh
    /// cells.
    pub fn resize_with_alignment(&mut self, len: usize, align: usize) {
        assert!(align.is_power_of_two(), "alignment must be a power of two");
        self.destroy();
        self.align = align.max(mem::align_of::<T>());
        self.allocate(len);
    }

    fn allocate(&mut self, len: usize) {
        self.cells.reserve_exact(len);
        for _ in 0..len {
            let cell = alloc_raw::<T>(self.align);
            // Safety: freshly allocated, properly aligned, uninitialized.
            unsafe { ptr::write(cell.as_ptr(), T::default()) };
            self.cells.push(cell);
        }
    }
}

impl<T> AlignedArray<T> {
    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the array has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Byte boundary each cell is aligned to.
    pub fn alignment(&self) -> usize {
        self.align
    }

    /// Checked access to a cell.
    pub fn get(&self, index: usize) -> Option<&T> {
        // Safety: every stored pointer is a live, initialized cell.
        self.cells.get(index).map(|cell| unsafe { &*cell.as_ptr() })
    }

    /// Checked mutable access to a cell.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.cells
            .get(index)
            .map(|cell| unsafe { &mut *cell.as_ptr() })
    }

    /// Hot-path accessor without a bounds check.
    ///
    /// # Safety
    ///
    /// `index` must be less than [`len`](AlignedArray::len).
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        &*self.cells.get_unchecked(index).as_ptr()
    }

    /// Mutable hot-path accessor without a bounds check.
    ///
    /// # Safety
    ///
    /// `index` must be less than [`len`](AlignedArray::len).
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        &mut *self.cells.get_unchecked(index).as_ptr()
    }

    /// Iterate over the cells by reference.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            cells: self.cells.iter(),
            _marker: PhantomData,
        }
    }

    /// Iterate over the cells by mutable reference.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            cells: self.cells.iter(),
            _marker: PhantomData,
        }
    }

    fn destroy(&mut self) {
        let layout = cell_layout::<T>(self.align);
        for cell in self.cells.drain(..) {
            // Safety: each cell holds an initialized T allocated with
            // exactly this layout.
            unsafe {
                ptr::drop_in_place(cell.as_ptr());
                dealloc(cell.as_ptr().cast(), layout);
            }
        }
    }
}

impl<T> Index<usize> for AlignedArray<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        unsafe { &*self.cells[index].as_ptr() }
    }
}

impl<T> IndexMut<usize> for AlignedArray<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        unsafe { &mut *self.cells[index].as_ptr() }
    }
}

impl<T> Drop for AlignedArray<T> {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<T: Clone> Clone for AlignedArray<T> {
    fn clone(&self) -> Self {
        let mut cells = Vec::with_capacity(self.cells.len());
        for cell in &self.cells {
            let fresh = alloc_raw::<T>(self.align);
            // Safety: source cell is initialized; fresh cell is not.
            unsafe { ptr::write(fresh.as_ptr(), (*cell.as_ptr()).clone()) };
            cells.push(fresh);
        }
        Self {
            cells,
            align: self.align,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for AlignedArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Iterator over cell references.
#[derive(Debug)]
pub struct Iter<'a, T> {
    cells: std::slice::Iter<'a, NonNull<T>>,
    _marker: PhantomData<&'a T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.cells.next().map(|cell| unsafe { &*cell.as_ptr() })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.cells.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

/// Iterator over mutable cell references.
#[derive(Debug)]
pub struct IterMut<'a, T> {
    cells: std::slice::Iter<'a, NonNull<T>>,
    _marker: PhantomData<&'a mut T>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        // Safety: cells are disjoint allocations, so handing out one &mut
        // per cell cannot alias.
        self.cells.next().map(|cell| unsafe { &mut *cell.as_ptr() })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.cells.size_hint()
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

impl<'a, T> IntoIterator for &'a AlignedArray<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut AlignedArray<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}
