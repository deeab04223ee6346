use bitfield_struct::bitfield;

/// Client command specifiers (ccs) sent to the drive.
pub(crate) const CCS_INITIATE_DOWNLOAD: u8 = 1;
pub(crate) const CCS_INITIATE_UPLOAD: u8 = 2;

/// Server command specifiers (scs) received from the drive.
pub(crate) const SCS_INITIATE_UPLOAD: u8 = 2;
pub(crate) const SCS_INITIATE_DOWNLOAD: u8 = 3;
pub(crate) const CS_ABORT: u8 = 4;

/// First byte of an expedited SDO initiate frame, shared by the download
/// request and the upload response. Bit 7 is the most significant field bit.
#[bitfield(u8, order = Msb)]
pub struct SdoInitiateCmd {
    /// Command specifier, ccs or scs depending on the direction.
    #[bits(3)]
    pub cs: u8,

    #[bits(1)]
    _reserved_0: u8,

    /// Bytes of the 4-byte data field that carry no data. Valid when `s` is set.
    #[bits(2)]
    pub n: u8,

    /// Expedited
    #[bits(1)]
    pub e: bool,

    /// Size indicated
    #[bits(1)]
    pub s: bool,
}

impl SdoInitiateCmd {
    /// Expedited initiate download carrying `len` (1..=4) data bytes.
    pub fn expedited_download(len: usize) -> Self {
        SdoInitiateCmd::new()
            .with_cs(CCS_INITIATE_DOWNLOAD)
            .with_n((4 - len.clamp(1, 4)) as u8)
            .with_e(true)
            .with_s(true)
    }

    pub fn upload_request() -> Self {
        SdoInitiateCmd::new().with_cs(CCS_INITIATE_UPLOAD)
    }

    /// Number of meaningful bytes in an expedited frame.
    pub fn expedited_len(&self) -> usize {
        if self.s() { 4 - self.n() as usize } else { 4 }
    }
}
