//! Common test fixtures for tile source tests.
//!
//! Payloads mimic what real WMS servers send back: encoded images on
//! success, XML or plain-text exception documents on failure.

/// Common bounding box definitions for testing, as (minx, miny, maxx, maxy).
pub mod bbox {
    /// Global bounding box in EPSG:4326
    pub const GLOBAL: (f64, f64, f64, f64) = (-180.0, -90.0, 180.0, 90.0);

    /// Full Web Mercator extent (EPSG:3857)
    pub const WEB_MERCATOR: (f64, f64, f64, f64) = (
        -20037508.342789244,
        -20037508.342789244,
        20037508.342789244,
        20037508.342789244,
    );

    /// A small tile with awkward fractional edges
    pub const SMALL_TILE: (f64, f64, f64, f64) = (-100.125, 40.0000001, -99.0625, 41.333333333333336);
}

/// Response bodies returned by upstream servers.
pub mod payloads {
    /// PNG file signature.
    pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    /// JPEG start-of-image marker followed by a JFIF APP0 marker.
    pub const JPEG_SIGNATURE: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xE0];

    /// GIF89a header, a valid image the cache does not store.
    pub const GIF_SIGNATURE: &[u8] = b"GIF89a";

    /// A WMS 1.1.1 service exception report.
    pub const WMS_EXCEPTION_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ServiceExceptionReport version="1.1.1">
  <ServiceException code="LayerNotDefined">Layer 'roads' is not defined</ServiceException>
</ServiceExceptionReport>"#;

    /// Plain-text error page some servers send with a 200 status.
    pub const PLAIN_TEXT_ERROR: &str = "msWMSLoadGetMapParams(): WMS server error. Invalid layer(s) given in the LAYERS parameter.";

    /// A PNG signature followed by `body_len` bytes of filler.
    pub fn png_bytes(body_len: usize) -> Vec<u8> {
        let mut data = PNG_SIGNATURE.to_vec();
        data.extend((0..body_len).map(|i| (i % 251) as u8));
        data
    }

    /// A JPEG signature followed by `body_len` bytes of filler.
    pub fn jpeg_bytes(body_len: usize) -> Vec<u8> {
        let mut data = JPEG_SIGNATURE.to_vec();
        data.extend((0..body_len).map(|i| (i % 241) as u8));
        data
    }
}

/// Configuration documents.
pub mod config {
    /// A complete, valid WMS source block.
    pub const WMS_SOURCE: &str = r#"<source name="vmap0" type="wms">
  <url>http://vmap0.tiles.osgeo.org/wms/vmap0</url>
  <wmsparams>
    <FORMAT>image/png</FORMAT>
    <LAYERS>basic</LAYERS>
  </wmsparams>
</source>"#;

    /// A configuration document declaring two valid sources.
    pub const TWO_SOURCES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<tilecache>
  <source name="vmap0" type="wms">
    <url>http://vmap0.tiles.osgeo.org/wms/vmap0</url>
    <wmsparams>
      <LAYERS>basic</LAYERS>
    </wmsparams>
  </source>
  <source name="nexrad" type="WMS">
    <url>http://mesonet.agron.iastate.edu/cgi-bin/wms/nexrad/n0r.cgi?</url>
    <wmsparams>
      <LAYERS>nexrad-n0r</LAYERS>
      <TRANSPARENT>true</TRANSPARENT>
    </wmsparams>
  </source>
  <tileset name="basic">
    <source>vmap0</source>
  </tileset>
</tilecache>"#;

    /// A configuration document where every source is broken in some way.
    pub const BROKEN_SOURCES: &str = r#"<tilecache>
  <source name="nourl" type="wms">
    <wmsparams><LAYERS>basic</LAYERS></wmsparams>
  </source>
  <source name="nothing" type="wms"/>
  <source type="wms"><url>http://x/wms</url></source>
  <source name="gdal" type="gdal"/>
</tilecache>"#;
}
