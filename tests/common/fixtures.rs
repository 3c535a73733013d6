//! Test fixtures for Confluence API responses
//!
//! This module provides realistic sample data from the Confluence REST API
//! for use in tests.

use serde_json::json;

// Sample response for a basic Confluence page
pub fn sample_page_response() -> serde_json::Value {
  json!({
    "id": "123456",
    "type": "page",
    "status": "current",
    "title": "Getting Started Guide",
    "body": {
      "storage": {
        "value": "<h1>Getting Started</h1><p>Welcome to our documentation!</p><p>This guide will help you get started with our product.</p>",
        "representation": "storage"
      }
    },
    "space": {
      "key": "DOCS",
      "name": "Documentation",
      "type": "global"
    },
    "_links": {
      "webui": "/wiki/spaces/DOCS/pages/123456/Getting+Started+Guide",
      "self": "https://example.atlassian.net/wiki/rest/api/content/123456"
    }
  })
}

// Sample response for a page with a code macro
pub fn sample_api_page_response() -> serde_json::Value {
  json!({
    "id": "789012",
    "type": "page",
    "status": "current",
    "title": "API Documentation",
    "body": {
      "storage": {
        "value": "<h1>API Documentation</h1><p>This API provides access to our services.</p><ac:structured-macro ac:name=\"code\"><ac:parameter ac:name=\"language\">python</ac:parameter><ac:plain-text-body><![CDATA[import requests\nrequests.get(\"https://api.example.com\")]]></ac:plain-text-body></ac:structured-macro>",
        "representation": "storage"
      }
    },
    "space": {
      "key": "DEV",
      "name": "Development",
      "type": "global"
    },
    "_links": {
      "webui": "/wiki/spaces/DEV/pages/789012/API+Documentation"
    }
  })
}

// Search result entry lacking title, body, and links, as returned for
// degenerate content
pub fn sample_untitled_page_response() -> serde_json::Value {
  json!({
    "id": "550000",
    "type": "page",
    "status": "current",
    "space": {
      "key": "DOCS",
      "name": "Documentation",
      "type": "global"
    }
  })
}

// Child pages of the getting-started guide
pub fn sample_install_page_response() -> serde_json::Value {
  json!({
    "id": "223344",
    "type": "page",
    "status": "current",
    "title": "Installation Guide",
    "body": {
      "storage": {
        "value": "<p>Run the installer.</p>",
        "representation": "storage"
      }
    },
    "space": {
      "key": "DOCS",
      "name": "Documentation",
      "type": "global"
    },
    "_links": {
      "webui": "/wiki/spaces/DOCS/pages/223344/Installation+Guide"
    }
  })
}

pub fn sample_configure_page_response() -> serde_json::Value {
  json!({
    "id": "334455",
    "type": "page",
    "status": "current",
    "title": "Configuration Guide",
    "body": {
      "storage": {
        "value": "<p>Edit the config file.</p>",
        "representation": "storage"
      }
    },
    "space": {
      "key": "DOCS",
      "name": "Documentation",
      "type": "global"
    },
    "_links": {
      "webui": "/wiki/spaces/DOCS/pages/334455/Configuration+Guide"
    }
  })
}

// Minimal pages titled "A" and "B" for ordering assertions
pub fn sample_page_titled_a() -> serde_json::Value {
  json!({
    "id": "1001",
    "type": "page",
    "status": "current",
    "title": "A",
    "body": {
      "storage": {"value": "<p>First document.</p>", "representation": "storage"}
    },
    "space": {"key": "DOCS", "name": "Documentation", "type": "global"}
  })
}

pub fn sample_page_titled_b() -> serde_json::Value {
  json!({
    "id": "1002",
    "type": "page",
    "status": "current",
    "title": "B",
    "body": {
      "storage": {"value": "<p>Second document.</p>", "representation": "storage"}
    },
    "space": {"key": "DOCS", "name": "Documentation", "type": "global"}
  })
}
