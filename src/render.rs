//! HTML map output.
//!
//! Produces one self-contained page driving Leaflet with the
//! Leaflet.awesome-markers plugin. Tiles and scripts load from public CDNs
//! when the page is opened.

use std::path::Path;

use serde::Serialize;

use crate::error::{MovieMapError, Result};
use crate::geo::Coordinates;

/// Marker styling, in awesome-markers terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkerIcon {
    pub color: String,
    pub icon_color: String,
    /// Bootstrap glyphicon name.
    pub glyph: String,
}

impl MarkerIcon {
    pub fn new(color: &str, icon_color: &str, glyph: &str) -> Self {
        Self {
            color: color.to_string(),
            icon_color: icon_color.to_string(),
            glyph: glyph.to_string(),
        }
    }

    /// Green pin with a yellow camera.
    pub fn movie() -> Self {
        Self::new("green", "yellow", "camera")
    }

    /// Red pin with a blue house.
    pub fn home() -> Self {
        Self::new("red", "blue", "home")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    #[serde(flatten)]
    pub coords: Coordinates,
    /// Plain text; escaped on render.
    pub popup: String,
    pub icon: MarkerIcon,
}

impl Marker {
    pub fn new(coords: Coordinates, popup: impl Into<String>, icon: MarkerIcon) -> Self {
        Self {
            coords,
            popup: popup.into(),
            icon,
        }
    }
}

/// Popup-ready copy of a marker, HTML already escaped.
#[derive(Serialize)]
struct RenderedMarker<'a> {
    lat: f64,
    lon: f64,
    popup: String,
    icon: &'a MarkerIcon,
}

#[derive(Debug, Clone, Default)]
pub struct MovieMap {
    markers: Vec<Marker>,
    click_popup: Option<String>,
}

impl MovieMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    /// Clicking the map drops a marker with this popup.
    pub fn with_click_marker(mut self, popup: impl Into<String>) -> Self {
        self.click_popup = Some(popup.into());
        self
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn to_html(&self) -> Result<String> {
        let rendered: Vec<RenderedMarker<'_>> = self
            .markers
            .iter()
            .map(|m| RenderedMarker {
                lat: m.coords.lat,
                lon: m.coords.lon,
                popup: escape_html(&m.popup),
                icon: &m.icon,
            })
            .collect();
        let markers_json =
            serde_json::to_string(&rendered).map_err(|e| MovieMapError::Render(e.to_string()))?;
        let click_json = match &self.click_popup {
            Some(popup) => serde_json::to_string(&escape_html(popup))
                .map_err(|e| MovieMapError::Render(e.to_string()))?,
            None => "null".to_string(),
        };

        Ok(PAGE_TEMPLATE
            .replace("{{MARKERS}}", &markers_json)
            .replace("{{CLICK_POPUP}}", &click_json))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let html = self.to_html()?;
        std::fs::write(path, html).map_err(|e| MovieMapError::io(path, e))?;
        tracing::info!(path = %path.display(), markers = self.markers.len(), "map saved");
        Ok(())
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Movie map</title>
  <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" />
  <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/Leaflet.awesome-markers/2.0.2/leaflet.awesome-markers.css" />
  <link rel="stylesheet" href="https://maxcdn.bootstrapcdn.com/bootstrap/3.2.0/css/bootstrap.min.css" />
  <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
  <script src="https://cdnjs.cloudflare.com/ajax/libs/Leaflet.awesome-markers/2.0.2/leaflet.awesome-markers.js"></script>
  <style>
    html, body { width: 100%; height: 100%; margin: 0; padding: 0; }
    #map { position: absolute; top: 0; bottom: 0; left: 0; right: 0; }
  </style>
</head>
<body>
  <div id="map"></div>
  <script>
    var markers = {{MARKERS}};
    var clickPopup = {{CLICK_POPUP}};

    var map = L.map("map", { worldCopyJump: true });
    L.tileLayer("https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png", {
      maxZoom: 18,
      attribution: "&copy; OpenStreetMap contributors"
    }).addTo(map);

    var bounds = [];
    markers.forEach(function (m) {
      var icon = L.AwesomeMarkers.icon({
        icon: m.icon.glyph,
        prefix: "glyphicon",
        markerColor: m.icon.color,
        iconColor: m.icon.icon_color
      });
      L.marker([m.lat, m.lon], { icon: icon }).bindPopup(m.popup).addTo(map);
      bounds.push([m.lat, m.lon]);
    });

    if (bounds.length > 0) {
      map.fitBounds(bounds, { padding: [40, 40], maxZoom: 10 });
    } else {
      map.setView([0, 0], 2);
    }

    if (clickPopup !== null) {
      map.on("click", function (e) {
        L.marker(e.latlng).bindPopup(clickPopup).addTo(map);
      });
    }
  </script>
</body>
</html>
"#;
