use crate::{ContainerError, Vec};
use bytemuck::{Pod, Zeroable};

#[cfg(not(feature = "std"))]
use alloc::vec;

/// Owned, fixed-length storage for plain-old-data elements.
///
/// The length is decided at construction and never changes afterwards;
/// elements are read and written in place. `T` must implement
/// [`bytemuck::Pod`], which lets the whole container be viewed as a byte
/// slice without copying.
///
/// # Examples
///
/// ```
/// use raw_bytes::Container;
///
/// let mut blocks = Container::<u64>::zeroed(4);
/// blocks.write(1, 0xDEAD_BEEF).unwrap();
///
/// assert_eq!(blocks.len(), 4);
/// assert_eq!(blocks.get(1).unwrap(), &0xDEAD_BEEF);
/// assert_eq!(blocks.as_bytes().len(), 32);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container<T: Pod> {
    data: Vec<T>,
}

impl<T: Pod> Container<T> {
    /// Creates a container of `len` zero-valued elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use raw_bytes::Container;
    ///
    /// let c = Container::<u32>::zeroed(3);
    /// assert_eq!(c.as_slice(), &[0, 0, 0]);
    /// ```
    pub fn zeroed(len: usize) -> Self {
        Container {
            data: vec![T::zeroed(); len],
        }
    }

    /// Creates a container holding a copy of `values`.
    pub fn from_slice(values: &[T]) -> Self {
        Container {
            data: values.to_vec(),
        }
    }

    /// Takes ownership of `values` without copying.
    pub fn from_vec(values: Vec<T>) -> Self {
        Container { data: values }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Size of the container in bytes.
    #[inline]
    pub fn byte_len(&self) -> usize {
        core::mem::size_of_val(self.data.as_slice())
    }

    /// Returns a reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::OutOfBounds` if `index >= len()`.
    #[inline]
    pub fn get(&self, index: usize) -> Result<&T, ContainerError> {
        self.data
            .get(index)
            .ok_or(ContainerError::OutOfBounds(index, self.data.len()))
    }

    /// Returns a mutable reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::OutOfBounds` if `index >= len()`.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Result<&mut T, ContainerError> {
        let len = self.data.len();
        self.data
            .get_mut(index)
            .ok_or(ContainerError::OutOfBounds(index, len))
    }

    /// Overwrites the element at `index`.
    ///
    /// # Examples
    ///
    /// ```
    /// use raw_bytes::Container;
    ///
    /// let mut c = Container::from_slice(&[1u64, 2]);
    /// c.write(0, 99).unwrap();
    /// assert_eq!(c.as_slice(), &[99, 2]);
    /// assert!(c.write(2, 5).is_err());
    /// ```
    pub fn write(&mut self, index: usize, value: T) -> Result<(), ContainerError> {
        *self.get_mut(index)? = value;
        Ok(())
    }

    /// Replaces every element with a copy of `src`, which must have the same
    /// length as the container.
    pub fn copy_from_slice(&mut self, src: &[T]) -> Result<(), ContainerError> {
        if src.len() != self.data.len() {
            return Err(ContainerError::LengthMismatch {
                expected: self.data.len(),
                found: src.len(),
            });
        }
        self.data.copy_from_slice(src);
        Ok(())
    }

    /// Resets every element to zero.
    pub fn zero(&mut self) {
        self.data.fill(T::zeroed());
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Views the elements as native-endian bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.data.iter()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T: Pod> core::ops::Index<usize> for Container<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl<T: Pod> core::ops::IndexMut<usize> for Container<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.data[index]
    }
}

impl<T: Pod> Default for Container<T> {
    fn default() -> Self {
        Container { data: Vec::new() }
    }
}

impl<'a, T: Pod> IntoIterator for &'a Container<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
